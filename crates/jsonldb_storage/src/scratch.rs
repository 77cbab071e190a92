//! Scratch files for copy-rewrite.
//!
//! A [`ScratchFile`] is a uniquely named temporary file created in the same
//! directory as the file it will eventually replace, so the final rename is
//! a same-volume move. The file is removed when the `ScratchFile` is
//! dropped without being committed, whatever the exit path.
//!
//! Uses write-then-rename for crash safety:
//! 1. Write the new content to the scratch file
//! 2. Optionally sync the scratch file to disk
//! 3. Rename the scratch file over the target
//! 4. Optionally fsync the directory so the rename is durable

use crate::error::{StorageError, StorageResult};
use crate::line_file::sync_parent_dir;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write buffer size for scratch output.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// A temporary file staged beside a target path.
#[derive(Debug)]
pub struct ScratchFile {
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
    lines_written: u64,
    sync_writes: bool,
}

impl ScratchFile {
    /// Creates a new scratch file in the directory of `target`.
    ///
    /// The name is derived from the target's file name plus a random
    /// suffix, e.g. `.users.jsonl.Ab12Cd.tmp`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch file cannot be created.
    pub fn beside(target: &Path) -> StorageResult<Self> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = match target.file_name() {
            Some(name) => format!(".{}.", name.to_string_lossy()),
            None => ".scratch.".to_string(),
        };

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tracing::trace!(scratch = %temp.path().display(), "created scratch file");

        Ok(Self {
            target: target.to_path_buf(),
            writer: BufWriter::with_capacity(WRITE_BUFFER_SIZE, temp),
            lines_written: 0,
            sync_writes: false,
        })
    }

    /// Sets whether [`ScratchFile::commit`] syncs data and directory.
    #[must_use]
    pub fn sync_writes(mut self, value: bool) -> Self {
        self.sync_writes = value;
        self
    }

    /// Returns the path of the scratch file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    /// Returns the path that [`ScratchFile::commit`] will replace.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the number of lines written so far.
    #[must_use]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Writes one line. Lines are newline-separated with no trailing
    /// newline after the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_line(&mut self, line: &[u8]) -> StorageResult<()> {
        if self.lines_written > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(line)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Atomically replaces the target with the scratch content.
    ///
    /// The rename is the only commit point: if anything fails before it,
    /// the target is untouched and the scratch file is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing, syncing, or renaming fails.
    pub fn commit(self) -> StorageResult<()> {
        let Self {
            target,
            writer,
            sync_writes,
            ..
        } = self;

        let temp = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        if sync_writes {
            temp.as_file().sync_all()?;
        }

        // Keep the target's permissions rather than the scratch file's 0600.
        match fs::metadata(&target) {
            Ok(meta) => fs::set_permissions(temp.path(), meta.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        temp.persist(&target).map_err(|e| StorageError::Persist {
            target: target.clone(),
            source: e.error,
        })?;

        if sync_writes {
            sync_parent_dir(&target)?;
        }

        tracing::trace!(target = %target.display(), "committed scratch file");
        Ok(())
    }
}

/// Runs `f` with a scratch file beside `target` and commits it if `f`
/// succeeds.
///
/// If `f` returns an error the scratch file is removed and the target is
/// left untouched.
///
/// # Errors
///
/// Returns the error from `f`, or a storage error from creating or
/// committing the scratch file.
pub fn with_scratch_file<T, E, F>(target: &Path, sync_writes: bool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut ScratchFile) -> Result<T, E>,
    E: From<StorageError>,
{
    let mut scratch = ScratchFile::beside(target)?.sync_writes(sync_writes);
    let value = f(&mut scratch)?;
    scratch.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn scratch_lives_beside_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("users.jsonl");

        let scratch = ScratchFile::beside(&target).unwrap();
        assert_eq!(scratch.path().parent(), Some(dir.path()));
        assert_eq!(scratch.target(), target.as_path());

        let name = scratch.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(".users.jsonl."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn scratch_names_do_not_collide() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");

        let a = ScratchFile::beside(&target).unwrap();
        let b = ScratchFile::beside(&target).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn commit_replaces_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");
        fs::write(&target, "old").unwrap();

        let mut scratch = ScratchFile::beside(&target).unwrap();
        scratch.write_line(b"one").unwrap();
        scratch.write_line(b"two").unwrap();
        assert_eq!(scratch.lines_written(), 2);
        scratch.commit().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "one\ntwo");
        assert_eq!(dir_entries(dir.path()), vec!["data.jsonl"]);
    }

    #[test]
    fn commit_with_sync() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");

        let mut scratch = ScratchFile::beside(&target).unwrap().sync_writes(true);
        scratch.write_line(b"x").unwrap();
        scratch.commit().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "x");
    }

    #[test]
    fn drop_without_commit_cleans_up() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");
        fs::write(&target, "original").unwrap();

        {
            let mut scratch = ScratchFile::beside(&target).unwrap();
            scratch.write_line(b"partial").unwrap();
            assert!(scratch.path().exists());
        }

        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
        assert_eq!(dir_entries(dir.path()), vec!["data.jsonl"]);
    }

    #[test]
    fn drop_after_external_removal_is_fine() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");

        let scratch = ScratchFile::beside(&target).unwrap();
        fs::remove_file(scratch.path()).unwrap();
        drop(scratch);

        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn with_scratch_file_error_leaves_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");
        fs::write(&target, "keep me").unwrap();

        let result: Result<(), StorageError> = with_scratch_file(&target, false, |scratch| {
            scratch.write_line(b"discarded")?;
            Err(StorageError::not_found("boom"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "keep me");
        assert_eq!(dir_entries(dir.path()), vec!["data.jsonl"]);
    }

    #[test]
    fn with_scratch_file_success_commits() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");

        let written: Result<u64, StorageError> = with_scratch_file(&target, false, |scratch| {
            scratch.write_line(b"a")?;
            Ok(scratch.lines_written())
        });

        assert_eq!(written.unwrap(), 1);
        assert_eq!(fs::read_to_string(&target).unwrap(), "a");
    }

    #[cfg(unix)]
    #[test]
    fn commit_keeps_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let target = dir.path().join("data.jsonl");
        fs::write(&target, "x").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

        let mut scratch = ScratchFile::beside(&target).unwrap();
        scratch.write_line(b"y").unwrap();
        scratch.commit().unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
