//! Shared helpers for the JSONLDB benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
