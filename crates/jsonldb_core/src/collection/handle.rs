//! Untyped collection handle.

use crate::error::CoreResult;
use crate::file::{JsonlFile, RewriteResult};
use jsonldb_codec::Record;
use serde_json::Value;
use std::path::Path;

/// A named collection backed by one JSON Lines file.
///
/// Queries are predicate-based and array-returning. [`Collection::update`]
/// and [`Collection::delete`] persist through copy-rewrite; the
/// `project_*` variants compute the same result in memory and leave the
/// file alone.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    file: JsonlFile,
}

impl Collection {
    pub(crate) fn new(name: String, file: JsonlFile) -> Self {
        Self { name, file }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the underlying file store.
    #[must_use]
    pub fn file(&self) -> &JsonlFile {
        &self.file
    }

    /// Adds an object or an array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidInput`] if `value` is anything
    /// else; nothing is written then.
    pub fn add(&self, value: Value) -> CoreResult<usize> {
        self.file.add(value)
    }

    /// Returns the first record satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn find_one<P>(&self, predicate: P) -> CoreResult<Option<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        self.file.find_first(predicate)
    }

    /// Returns every record satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn find<P>(&self, predicate: P) -> CoreResult<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        self.file.find_match(predicate)
    }

    /// Counts records satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn count<P>(&self, predicate: P) -> CoreResult<usize>
    where
        P: FnMut(&Record) -> bool,
    {
        self.file.count_match(predicate)
    }

    /// Counts all records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn count_all(&self) -> CoreResult<usize> {
        self.file.count()
    }

    /// Transforms matching records and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewrite fails; the file is then unchanged.
    pub fn update<P, F>(&self, predicate: P, update_fn: F) -> CoreResult<RewriteResult>
    where
        P: FnMut(&Record) -> bool,
        F: FnMut(Record) -> Record,
    {
        self.file.update_match(predicate, update_fn)
    }

    /// Removes matching records and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewrite fails; the file is then unchanged.
    pub fn delete<P>(&self, predicate: P) -> CoreResult<RewriteResult>
    where
        P: FnMut(&Record) -> bool,
    {
        self.file.delete_match(predicate)
    }

    /// Returns every record with matches transformed, without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn project_update<P, F>(
        &self,
        mut predicate: P,
        mut update_fn: F,
    ) -> CoreResult<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
        F: FnMut(Record) -> Record,
    {
        self.file
            .records()?
            .map(|record| {
                let record = record?;
                Ok(if predicate(&record) {
                    update_fn(record)
                } else {
                    record
                })
            })
            .collect()
    }

    /// Returns the records that a [`Collection::delete`] would keep,
    /// without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn project_delete<P>(&self, mut predicate: P) -> CoreResult<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        self.file.find_match(|record| !predicate(record))
    }
}
