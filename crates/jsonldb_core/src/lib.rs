//! # JSONLDB Core
//!
//! Embedded JSON Lines store.
//!
//! This crate provides:
//! - [`JsonlFile`]: streaming traversal and queries over one file
//! - Copy-rewrite update and delete that never leave a partial file
//! - [`CollectionDir`]: named collections under one directory
//! - [`TypedCollection`]: serde-typed access to a collection
//! - [`StoreStats`]: usage counters
//!
//! All operations are synchronous. No data is cached between calls; the
//! file content is the only source of truth.
//!
//! ## Example
//!
//! ```rust
//! use jsonldb_core::{CollectionDir, Config};
//! use serde_json::json;
//! use std::ops::ControlFlow;
//! # let tmp = tempfile::tempdir().unwrap();
//!
//! let db = CollectionDir::open(tmp.path(), Config::default()).unwrap();
//! let events = db.collection("events").unwrap();
//! events
//!     .add(json!([{"kind": "open"}, {"kind": "click"}, {"kind": "close"}]))
//!     .unwrap();
//!
//! let mut seen = Vec::new();
//! events
//!     .file()
//!     .read_line_by_line(|record| {
//!         seen.push(record["kind"].clone());
//!         if record["kind"] == json!("click") {
//!             ControlFlow::Break(())
//!         } else {
//!             ControlFlow::Continue(())
//!         }
//!     })
//!     .unwrap();
//! assert_eq!(seen, vec![json!("open"), json!("click")]);
//!
//! events.delete(|r| r["kind"] == json!("click")).unwrap();
//! assert_eq!(events.count_all().unwrap(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod error;
mod file;
mod stats;

pub use collection::{Collection, CollectionDir, TypedCollection};
pub use config::{Config, DEFAULT_BATCH_SIZE, DEFAULT_EXTENSION};
pub use error::{CoreError, CoreResult};
pub use file::{Batches, JsonlFile, RecordIter, Rewrite, RewriteResult};
pub use jsonldb_codec::{Record, Value};
pub use stats::{StatsSnapshot, StoreStats};
