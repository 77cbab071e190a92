//! Traversal operations.
//!
//! Every query is a single forward pass over a fresh [`RecordIter`]. The
//! closure-driven forms use [`ControlFlow`] as the stop signal: returning
//! `ControlFlow::Break(())` ends the traversal before another line is read.

use super::reader::{Batches, RecordIter};
use super::JsonlFile;
use crate::error::{CoreError, CoreResult};
use jsonldb_codec::{field_equals, Record, Value};
use std::ops::ControlFlow;

impl JsonlFile {
    /// Returns a lazy iterator over the records in file order.
    ///
    /// A missing file yields no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened. Read errors
    /// during iteration are yielded as `Err` items.
    pub fn records(&self) -> CoreResult<RecordIter> {
        Ok(RecordIter::new(self.decoded_lines()?))
    }

    /// Returns an iterator over batches of `batch_size` records.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBatchSize`] if `batch_size` is zero,
    /// before the file is opened.
    pub fn batches(&self, batch_size: usize) -> CoreResult<Batches> {
        if batch_size == 0 {
            return Err(CoreError::InvalidBatchSize { size: batch_size });
        }
        Ok(Batches::new(self.records()?, batch_size))
    }

    /// Returns an iterator over batches of the configured default size.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBatchSize`] if the configured size is zero.
    pub fn batches_default(&self) -> CoreResult<Batches> {
        self.batches(self.config.default_batch_size)
    }

    /// Calls `on_record` for each record in file order until it breaks.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn read_line_by_line<F>(&self, mut on_record: F) -> CoreResult<()>
    where
        F: FnMut(Record) -> ControlFlow<()>,
    {
        for record in self.records()? {
            if on_record(record?).is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Calls `on_batch` for each batch of `batch_size` records until it
    /// breaks.
    ///
    /// The last batch may be smaller. After a break no further record is
    /// read, so a partially filled next batch is never delivered.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBatchSize`] if `batch_size` is zero, or
    /// the first read error encountered.
    pub fn read_by_batch<F>(&self, batch_size: usize, mut on_batch: F) -> CoreResult<()>
    where
        F: FnMut(Vec<Record>) -> ControlFlow<()>,
    {
        for batch in self.batches(batch_size)? {
            if on_batch(batch?).is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Counts decodable records. Malformed lines are not counted.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn count(&self) -> CoreResult<usize> {
        self.count_match(|_| true)
    }

    /// Counts records satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn count_match<P>(&self, mut predicate: P) -> CoreResult<usize>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut count = 0;
        for record in self.records()? {
            if predicate(&record?) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Returns the first record whose `attribute` strictly equals `value`.
    ///
    /// See [`jsonldb_codec::strict_equals`] for the equality used. Stops
    /// reading at the first match.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn find_where(&self, attribute: &str, value: &Value) -> CoreResult<Option<Record>> {
        self.find_first(|record| field_equals(record, attribute, value))
    }

    /// Returns the first record satisfying `predicate`, stopping there.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn find_first<P>(&self, mut predicate: P) -> CoreResult<Option<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        for record in self.records()? {
            let record = record?;
            if predicate(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Returns every record satisfying `predicate`, in file order.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn find_match<P>(&self, mut predicate: P) -> CoreResult<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut found = Vec::new();
        for record in self.records()? {
            let record = record?;
            if predicate(&record) {
                found.push(record);
            }
        }
        Ok(found)
    }

    /// Returns every record in file order.
    ///
    /// This materializes the whole file; prefer [`JsonlFile::records`] or
    /// [`JsonlFile::batches`] for large files.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub fn all(&self) -> CoreResult<Vec<Record>> {
        self.records()?.collect()
    }

    /// Returns the first decodable record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyFile`] if there is none.
    pub fn first(&self) -> CoreResult<Record> {
        match self.records()?.next() {
            Some(record) => record,
            None => Err(CoreError::empty_file(self.path())),
        }
    }

    /// Returns the last decodable record.
    ///
    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyFile`] if there is none.
    pub fn last(&self) -> CoreResult<Record> {
        let mut last = None;
        for record in self.records()? {
            last = Some(record?);
        }
        last.ok_or_else(|| CoreError::empty_file(self.path()))
    }
}
