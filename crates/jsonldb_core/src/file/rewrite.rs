//! Copy-rewrite mutation.
//!
//! Every update and delete streams the source into a scratch file beside
//! it and renames the scratch file over the source. The rename is the only
//! commit point: an error anywhere before it leaves the source byte for
//! byte as it was, and the scratch file is removed on drop.

use super::reader::Decoded;
use super::JsonlFile;
use crate::error::CoreResult;
use jsonldb_codec::{encode_record, field_equals, Record, Value};
use jsonldb_storage::with_scratch_file;

/// What a rewrite does with one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Write the record back unchanged. Not counted as a match.
    Keep(Record),
    /// Write this record in place of the original.
    Replace(Record),
    /// Leave the record out.
    Drop,
}

/// Outcome of a committed rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteResult {
    /// Records decoded from the source.
    pub records_read: u64,
    /// Records that were replaced or dropped.
    pub records_matched: u64,
    /// Lines written to the new file, including kept malformed lines.
    pub records_written: u64,
    /// Undecodable lines encountered.
    pub malformed_lines: u64,
}

impl JsonlFile {
    /// Rewrites the file, deciding per record with `f`.
    ///
    /// Records are visited and written in file order. Malformed lines are
    /// dropped unless `Config::keep_malformed_lines` is set, in
    /// which case they are copied verbatim.
    ///
    /// A missing file is left missing and yields an all-zero result.
    ///
    /// # Errors
    ///
    /// Returns the first error from `f`, from encoding, or from I/O. The
    /// source file is unchanged in every error case.
    pub fn rewrite<F>(&self, mut f: F) -> CoreResult<RewriteResult>
    where
        F: FnMut(Record) -> CoreResult<Rewrite>,
    {
        if !self.exists()? {
            return Ok(RewriteResult::default());
        }

        let keep_malformed = self.config.keep_malformed_lines;
        let sync = self.config.sync_writes;
        let outcome = with_scratch_file(self.path(), sync, |scratch| -> CoreResult<RewriteResult> {
            let mut result = RewriteResult::default();
            for line in self.decoded_lines()? {
                match line? {
                    Decoded::Record(record) => {
                        result.records_read += 1;
                        let out = match f(record)? {
                            Rewrite::Keep(record) => record,
                            Rewrite::Replace(record) => {
                                result.records_matched += 1;
                                record
                            }
                            Rewrite::Drop => {
                                result.records_matched += 1;
                                continue;
                            }
                        };
                        scratch.write_line(encode_record(&out)?.as_bytes())?;
                        result.records_written += 1;
                    }
                    Decoded::Malformed(line) => {
                        result.malformed_lines += 1;
                        if keep_malformed {
                            scratch.write_line(line.as_bytes())?;
                            result.records_written += 1;
                        }
                    }
                }
            }
            Ok(result)
        });

        match outcome {
            Ok(result) => {
                self.stats.record_rewrite(result.records_written);
                tracing::debug!(
                    path = %self.path().display(),
                    read = result.records_read,
                    matched = result.records_matched,
                    written = result.records_written,
                    malformed = result.malformed_lines,
                    "rewrote file"
                );
                Ok(result)
            }
            Err(err) => {
                self.stats.record_rewrite_abort();
                tracing::warn!(path = %self.path().display(), error = %err, "rewrite aborted");
                Err(err)
            }
        }
    }

    /// Replaces every record whose `attribute` strictly equals `value`
    /// with `update_fn(record)`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, encoding, or committing fails.
    pub fn update_where<F>(
        &self,
        attribute: &str,
        value: &Value,
        update_fn: F,
    ) -> CoreResult<RewriteResult>
    where
        F: FnMut(Record) -> Record,
    {
        self.update_match(|record| field_equals(record, attribute, value), update_fn)
    }

    /// Replaces every record satisfying `predicate` with
    /// `update_fn(record)`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, encoding, or committing fails.
    pub fn update_match<P, F>(
        &self,
        mut predicate: P,
        mut update_fn: F,
    ) -> CoreResult<RewriteResult>
    where
        P: FnMut(&Record) -> bool,
        F: FnMut(Record) -> Record,
    {
        self.rewrite(|record| {
            Ok(if predicate(&record) {
                Rewrite::Replace(update_fn(record))
            } else {
                Rewrite::Keep(record)
            })
        })
    }

    /// Like [`JsonlFile::update_match`] with fallible closures.
    ///
    /// # Errors
    ///
    /// The first `Err` from either closure aborts the update and is
    /// returned; the file is left unchanged.
    pub fn try_update_match<P, F>(
        &self,
        mut predicate: P,
        mut update_fn: F,
    ) -> CoreResult<RewriteResult>
    where
        P: FnMut(&Record) -> CoreResult<bool>,
        F: FnMut(Record) -> CoreResult<Record>,
    {
        self.rewrite(|record| {
            Ok(if predicate(&record)? {
                Rewrite::Replace(update_fn(record)?)
            } else {
                Rewrite::Keep(record)
            })
        })
    }

    /// Removes every record whose `attribute` strictly equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or committing fails.
    pub fn delete_where(&self, attribute: &str, value: &Value) -> CoreResult<RewriteResult> {
        self.delete_match(|record| field_equals(record, attribute, value))
    }

    /// Removes every record satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or committing fails.
    pub fn delete_match<P>(&self, mut predicate: P) -> CoreResult<RewriteResult>
    where
        P: FnMut(&Record) -> bool,
    {
        self.try_delete_match(|record| Ok(predicate(record)))
    }

    /// Like [`JsonlFile::delete_match`] with a fallible predicate.
    ///
    /// # Errors
    ///
    /// The first `Err` from `predicate` aborts the delete and is returned;
    /// the file is left unchanged.
    pub fn try_delete_match<P>(&self, mut predicate: P) -> CoreResult<RewriteResult>
    where
        P: FnMut(&Record) -> CoreResult<bool>,
    {
        self.rewrite(|record| {
            Ok(if predicate(&record)? {
                Rewrite::Drop
            } else {
                Rewrite::Keep(record)
            })
        })
    }
}
