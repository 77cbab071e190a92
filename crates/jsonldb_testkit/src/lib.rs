//! # JSONLDB Testkit
//!
//! Test utilities for JSONLDB.
//!
//! This crate provides:
//! - Temporary file and directory fixtures that clean up after themselves
//! - Helpers for writing raw (possibly malformed) lines
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use jsonldb_testkit::prelude::*;
//! use serde_json::json;
//!
//! with_temp_file(|file| {
//!     file.add(json!({"name": "Alice"})).unwrap();
//!     assert_eq!(file.count().unwrap(), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
