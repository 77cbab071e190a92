//! Single-file JSON Lines store.
//!
//! [`JsonlFile`] is the core engine. It is split across:
//!
//! - this module: handle, appends, and file lifecycle
//! - `reader`: streaming record and batch iterators
//! - `query`: traversal operations built on the iterators
//! - `rewrite`: copy-rewrite update and delete

mod query;
pub(crate) mod reader;
mod rewrite;

pub use reader::{Batches, RecordIter};
pub use rewrite::{Rewrite, RewriteResult};

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::stats::StoreStats;
use jsonldb_codec::{encode_record, records_from_value, records_from_values, to_record, Record};
use jsonldb_storage::{LineFile, StorageError};
use reader::DecodedLines;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A JSON Lines file holding one record per line.
///
/// `JsonlFile` holds no open handle and no cached state: the file content
/// is the only source of truth, and every call streams it again.
///
/// # Concurrency
///
/// There is no internal locking. At most one writer per file may be
/// active at a time; enforcing that is up to the caller (see
/// `Config::lock_directory` for a directory-level lock).
///
/// # Example
///
/// ```rust
/// use jsonldb_core::JsonlFile;
/// use serde_json::json;
/// # let dir = tempfile::tempdir().unwrap();
///
/// let file = JsonlFile::new(dir.path().join("people.jsonl"));
/// file.add(json!({"name": "Alice", "age": 25})).unwrap();
/// file.add(json!({"name": "Bob", "age": 30})).unwrap();
///
/// let bob = file.find_where("name", &json!("Bob")).unwrap().unwrap();
/// assert_eq!(bob["age"], json!(30));
///
/// file.update_where("name", &json!("Bob"), |mut r| {
///     r.insert("age".into(), json!(35));
///     r
/// })
/// .unwrap();
/// let bob = file.find_where("name", &json!("Bob")).unwrap().unwrap();
/// assert_eq!(bob["age"], json!(35));
///
/// file.delete_where("name", &json!("Bob")).unwrap();
/// assert_eq!(file.count().unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct JsonlFile {
    lines: LineFile,
    config: Config,
    stats: Arc<StoreStats>,
}

impl JsonlFile {
    /// Creates a handle for the file at `path` with default configuration.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, Config::default())
    }

    /// Creates a handle with custom configuration.
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self::with_shared_stats(path, config, Arc::new(StoreStats::new()))
    }

    pub(crate) fn with_shared_stats(
        path: impl Into<PathBuf>,
        config: Config,
        stats: Arc<StoreStats>,
    ) -> Self {
        let lines = LineFile::new(path)
            .sync_writes(config.sync_writes)
            .create_parent_dirs(config.create_parent_dirs);
        Self {
            lines,
            config,
            stats,
        }
    }

    /// Returns the path to the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.lines.path()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the statistics counters.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Returns true if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error for any access failure other than not-found.
    pub fn exists(&self) -> CoreResult<bool> {
        Ok(self.lines.exists()?)
    }

    /// Returns true if the file is missing or has no non-blank line.
    ///
    /// A file holding only malformed lines is not empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.lines.is_empty()?)
    }

    /// Creates the file empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or read.
    pub fn ensure(&self) -> CoreResult<()> {
        self.lines.ensure()?;
        Ok(())
    }

    /// Appends an object, or every object in an array.
    ///
    /// The whole input is validated before anything is written. An empty
    /// array is a no-op. Returns the number of records appended.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `value` is not an object or
    /// an array of objects, or an I/O error if the append fails.
    pub fn add(&self, value: Value) -> CoreResult<usize> {
        let records = records_from_value(value)?;
        self.append_all(&records)
    }

    /// Appends a sequence of objects.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if any element is not an object;
    /// nothing is written in that case.
    pub fn add_many<I>(&self, values: I) -> CoreResult<usize>
    where
        I: IntoIterator<Item = Value>,
    {
        let records = records_from_values(values)?;
        self.append_all(&records)
    }

    /// Serializes `value` and appends it.
    ///
    /// # Errors
    ///
    /// Returns a codec error if `value` does not serialize to an object.
    pub fn insert<T: Serialize + ?Sized>(&self, value: &T) -> CoreResult<()> {
        let record = to_record(value)?;
        self.append(&record)
    }

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn append(&self, record: &Record) -> CoreResult<()> {
        self.append_all(std::slice::from_ref(record)).map(|_| ())
    }

    /// Appends records in order as a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if any record cannot be encoded (nothing is written
    /// then) or the write fails.
    pub fn append_all<'a, I>(&self, records: I) -> CoreResult<usize>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let lines = records
            .into_iter()
            .map(encode_record)
            .collect::<Result<Vec<_>, _>>()?;
        if lines.is_empty() {
            return Ok(0);
        }

        let count = self.lines.append_lines(&lines)?;
        self.stats.record_append(count as u64);
        tracing::debug!(path = %self.path().display(), records = count, "appended records");
        Ok(count)
    }

    /// Deletes the file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileNotFound`] if the file does not exist.
    pub fn delete_file(&self) -> CoreResult<()> {
        match self.lines.remove() {
            Ok(()) => {
                tracing::debug!(path = %self.path().display(), "deleted file");
                Ok(())
            }
            Err(StorageError::NotFound { path }) => Err(CoreError::file_not_found(path)),
            Err(e) => Err(e.into()),
        }
    }

    /// Opens a fresh decoded-line stream.
    pub(crate) fn decoded_lines(&self) -> CoreResult<DecodedLines> {
        Ok(DecodedLines::new(self.lines.lines()?, Arc::clone(&self.stats)))
    }
}
