//! Streaming line iterator.
//!
//! Provides bounded-memory streaming over the lines of a text file, reading
//! one line at a time without loading the entire file into memory.
//!
//! Lines are split on `\n`, `\r\n`, and lone `\r`. Whitespace-only lines
//! are skipped but still advance the line counter, so [`RawLine::number`]
//! always refers to the physical line in the file.

use crate::error::StorageResult;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read buffer size for streaming iteration.
const READ_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

/// A single non-blank line read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based physical line number.
    pub number: u64,
    /// Line content without its terminator.
    pub bytes: Vec<u8>,
}

impl RawLine {
    /// Returns the line content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the line, returning its content.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Returns true if `bytes` is empty or contains only ASCII whitespace.
#[must_use]
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// A forward-only iterator over the non-blank lines of a file.
///
/// # Design
///
/// - A missing file produces an empty iterator, not an error
/// - Only the current line is held in memory, whatever the terminator
/// - Dropping the iterator closes the file handle, so consumers may stop
///   at any point without reading to the end
/// - After an I/O error the iterator yields `None`
///
/// # Example
///
/// ```
/// use jsonldb_storage::LineIter;
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().join("data.jsonl");
/// std::fs::write(&path, "one\r\n\n  \ntwo").unwrap();
///
/// let lines: Vec<_> = LineIter::open(&path)
///     .unwrap()
///     .map(|line| line.unwrap())
///     .collect();
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].number, 4);
/// assert_eq!(lines[1].as_bytes(), b"two");
/// ```
#[derive(Debug)]
pub struct LineIter {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    /// The previous line ended in `\r`, so a leading `\n` completes a CRLF.
    after_cr: bool,
    line_number: u64,
}

impl LineIter {
    /// Opens a line iterator over the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let reader = match File::open(path) {
            Ok(file) => Some(BufReader::with_capacity(READ_BUFFER_SIZE, file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            after_cr: false,
            line_number: 0,
        })
    }

    /// Returns the path being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads up to the next `\n`, `\r\n` or lone `\r`.
    ///
    /// Returns `Ok(None)` at end of file.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut line = Vec::new();
        let mut partial = false;
        loop {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                self.reader = None;
                return Ok(partial.then_some(line));
            }

            if self.after_cr {
                self.after_cr = false;
                if available[0] == b'\n' {
                    reader.consume(1);
                    continue;
                }
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    line.extend_from_slice(&available[..end]);
                    self.after_cr = available[end] == b'\r';
                    reader.consume(end + 1);
                    return Ok(Some(line));
                }
                None => {
                    let len = available.len();
                    line.extend_from_slice(available);
                    reader.consume(len);
                    partial = true;
                }
            }
        }
    }
}

impl Iterator for LineIter {
    type Item = StorageResult<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(Some(bytes)) => {
                    self.line_number += 1;
                    if is_blank(&bytes) {
                        continue;
                    }
                    return Some(Ok(RawLine {
                        number: self.line_number,
                        bytes,
                    }));
                }
                Ok(None) => return None,
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
