//! Line-oriented file handle for append and existence checks.

use crate::error::{StorageError, StorageResult};
use crate::lines::LineIter;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Separator written before the first line of an append.
///
/// Empty when the file has no non-blank content yet, a newline otherwise.
pub type Separator = &'static str;

/// A text file treated as an ordered sequence of lines.
///
/// `LineFile` does not interpret line contents and holds no open handle
/// between calls: every operation opens the file, does its work, and
/// closes it again. There is no internal locking; callers are expected to
/// have at most one writer per file.
///
/// # Durability
///
/// With [`LineFile::sync_writes`] enabled, appends call `File::sync_all()`
/// before returning. Otherwise data is handed to the OS and durability
/// follows the OS's write-back policy.
///
/// # Example
///
/// ```
/// use jsonldb_storage::LineFile;
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().join("data.jsonl");
///
/// let file = LineFile::new(&path);
/// assert!(file.is_empty().unwrap());
///
/// file.append_lines(["first"]).unwrap();
/// file.append_lines(["second", "third"]).unwrap();
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\nthird");
/// ```
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
    sync_writes: bool,
    create_parent_dirs: bool,
}

impl LineFile {
    /// Creates a handle for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: false,
            create_parent_dirs: true,
        }
    }

    /// Sets whether appends are synced to disk before returning.
    #[must_use]
    pub const fn sync_writes(mut self, value: bool) -> Self {
        self.sync_writes = value;
        self
    }

    /// Sets whether [`LineFile::ensure`] creates missing parent directories.
    #[must_use]
    pub const fn create_parent_dirs(mut self, value: bool) -> Self {
        self.create_parent_dirs = value;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether appends are synced to disk.
    #[must_use]
    pub const fn syncs_writes(&self) -> bool {
        self.sync_writes
    }

    /// Returns true if the path resolves to something the process can access.
    ///
    /// # Errors
    ///
    /// A missing file is `Ok(false)`; every other access error is returned.
    pub fn exists(&self) -> StorageResult<bool> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns true if the file is missing, has zero length, or holds only
    /// whitespace lines.
    ///
    /// Stops reading at the first non-blank line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn is_empty(&self) -> StorageResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() == 0 => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        }

        let mut lines = LineIter::open(&self.path)?;
        Ok(lines.next().transpose()?.is_none())
    }

    /// Makes sure the file exists and returns the separator the next
    /// append needs.
    ///
    /// - Missing file: created empty, returns `""`
    /// - Existing file with non-blank content: returns `"\n"`
    /// - Existing empty file: returns `""`
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be
    /// created, or the file cannot be read.
    pub fn ensure(&self) -> StorageResult<Separator> {
        if !self.exists()? {
            if self.create_parent_dirs {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            return Ok("");
        }

        if self.is_empty()? {
            Ok("")
        } else {
            Ok("\n")
        }
    }

    /// Appends `lines` to the file as a single write.
    ///
    /// The payload is `separator + lines.join("\n")`, where the separator
    /// comes from [`LineFile::ensure`]. No trailing newline is written.
    ///
    /// Returns the number of lines appended; empty input is a no-op that
    /// does not create the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn append_lines<I, S>(&self, lines: I) -> StorageResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut body = String::new();
        let mut count = 0usize;
        for line in lines {
            if count > 0 {
                body.push('\n');
            }
            body.push_str(line.as_ref());
            count += 1;
        }

        if count == 0 {
            return Ok(0);
        }

        let separator = self.ensure()?;
        let mut payload = String::with_capacity(separator.len() + body.len());
        payload.push_str(separator);
        payload.push_str(&body);

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(payload.as_bytes())?;
        if self.sync_writes {
            file.sync_all()?;
        }

        tracing::trace!(path = %self.path.display(), lines = count, "appended lines");
        Ok(count)
    }

    /// Opens a fresh streaming iterator over the non-blank lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened.
    pub fn lines(&self) -> StorageResult<LineIter> {
        LineIter::open(&self.path)
    }

    /// Deletes the file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the file does not exist, or the
    /// underlying error if removal fails.
    pub fn remove(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::not_found(&self.path))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Syncs the directory containing `path` so that a rename or create in it
/// is durable.
///
/// On Windows, directory fsync is not supported; NTFS journaling covers
/// metadata durability, so this is a no-op there.
#[cfg(unix)]
pub(crate) fn sync_parent_dir(path: &Path) -> StorageResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn sync_parent_dir(_path: &Path) -> StorageResult<()> {
    Ok(())
}
