//! # JSONLDB Storage
//!
//! Line-oriented file primitives for JSONLDB.
//!
//! This crate provides the lowest-level storage layer. It treats files as
//! **opaque sequences of text lines** and does not interpret their content.
//!
//! ## Design Principles
//!
//! - Files are read as bounded-memory streams, one line at a time
//! - A missing file reads as empty; it is created on first write
//! - Appends are single writes; rewrites go through a scratch file and a
//!   rename, which is the only commit point
//! - No internal locking: one writer per file is the caller's contract
//! - JSONLDB owns all record interpretation
//!
//! ## Components
//!
//! - [`LineFile`] - Existence checks, emptiness checks, and appends
//! - [`LineIter`] - Streaming iterator over non-blank lines
//! - [`ScratchFile`] - Temporary file staged beside a target for copy-rewrite
//!
//! ## Example
//!
//! ```rust
//! use jsonldb_storage::{LineFile, ScratchFile};
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("data.jsonl");
//!
//! let file = LineFile::new(&path);
//! file.append_lines(["a", "b", "c"]).unwrap();
//!
//! // Rewrite without the middle line.
//! let mut scratch = ScratchFile::beside(&path).unwrap();
//! for line in file.lines().unwrap() {
//!     let line = line.unwrap();
//!     if line.as_bytes() != b"b" {
//!         scratch.write_line(line.as_bytes()).unwrap();
//!     }
//! }
//! scratch.commit().unwrap();
//!
//! assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nc");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod line_file;
mod lines;
mod scratch;

pub use error::{StorageError, StorageResult};
pub use line_file::{LineFile, Separator};
pub use lines::{is_blank, LineIter, RawLine};
pub use scratch::{with_scratch_file, ScratchFile};
