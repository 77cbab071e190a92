//! Streaming record iterators.
//!
//! Provides bounded-memory iteration over the records of a file, decoding
//! one line at a time. A traversal stops as soon as the consumer stops
//! pulling; dropping the iterator closes the file.
//!
//! Malformed lines never end a traversal. Each one is logged at `warn`
//! level, counted in [`StoreStats`], and skipped.

use crate::error::CoreResult;
use crate::stats::StoreStats;
use jsonldb_codec::{decode_line, Record};
use jsonldb_storage::{LineIter, RawLine};
use std::sync::Arc;

/// One non-blank line after decoding.
#[derive(Debug)]
pub(crate) enum Decoded {
    /// The line held a record.
    Record(Record),
    /// The line could not be decoded; the raw bytes are kept.
    Malformed(RawLine),
}

/// Iterator over every non-blank line, decoded or not.
#[derive(Debug)]
pub(crate) struct DecodedLines {
    lines: LineIter,
    stats: Arc<StoreStats>,
}

impl DecodedLines {
    pub(crate) fn new(lines: LineIter, stats: Arc<StoreStats>) -> Self {
        stats.record_scan();
        Self { lines, stats }
    }
}

impl Iterator for DecodedLines {
    type Item = CoreResult<Decoded>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };

        match decode_line(line.as_bytes()) {
            Ok(record) => {
                self.stats.record_read();
                Some(Ok(Decoded::Record(record)))
            }
            Err(err) => {
                self.stats.record_malformed();
                tracing::warn!(
                    path = %self.lines.path().display(),
                    line = line.number,
                    reason = %err,
                    "skipping malformed line"
                );
                Some(Ok(Decoded::Malformed(line)))
            }
        }
    }
}

/// A lazy, forward-only iterator over the records of a file.
///
/// Created by [`crate::JsonlFile::records`]. Each call opens a new stream,
/// so a traversal that stopped early does not affect later ones.
///
/// # Example
///
/// ```rust
/// use jsonldb_core::JsonlFile;
/// use serde_json::json;
/// # let dir = tempfile::tempdir().unwrap();
///
/// let file = JsonlFile::new(dir.path().join("nums.jsonl"));
/// file.add(json!([{"n": 1}, {"n": 2}, {"n": 3}])).unwrap();
///
/// // Stop after the first record above 1; the rest is never read.
/// let hit = file
///     .records()
///     .unwrap()
///     .map(|r| r.unwrap())
///     .find(|r| r["n"].as_i64() > Some(1));
/// assert_eq!(hit.unwrap()["n"], json!(2));
/// ```
#[derive(Debug)]
pub struct RecordIter {
    inner: DecodedLines,
}

impl RecordIter {
    pub(crate) fn new(inner: DecodedLines) -> Self {
        Self { inner }
    }
}

impl Iterator for RecordIter {
    type Item = CoreResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(Decoded::Record(record)) => return Some(Ok(record)),
                Ok(Decoded::Malformed(_)) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// An iterator over fixed-size batches of records.
///
/// Every batch holds exactly `batch_size` records except possibly the
/// last, which holds the remainder. Records beyond the batch the consumer
/// stops at are never read.
#[derive(Debug)]
pub struct Batches {
    records: RecordIter,
    batch_size: usize,
    finished: bool,
}

impl Batches {
    /// Creates a batch iterator. `batch_size` must be non-zero.
    pub(crate) fn new(records: RecordIter, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0);
        Self {
            records,
            batch_size,
            finished: false,
        }
    }

    /// Returns the configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Iterator for Batches {
    type Item = CoreResult<Vec<Record>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.records.next() {
                Some(Ok(record)) => batch.push(record),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
