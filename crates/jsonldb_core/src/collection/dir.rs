//! Collection directory management.
//!
//! Layout:
//!
//! ```text
//! <root>/
//! ├─ LOCK              # Advisory lock (only with Config::lock_directory)
//! ├─ users.jsonl       # One file per collection
//! └─ orders.jsonl
//! ```

use super::{Collection, TypedCollection};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::file::JsonlFile;
use crate::stats::StoreStats;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const LOCK_FILE: &str = "LOCK";

/// A directory of collections.
///
/// With `Config::lock_directory` set, the handle holds an exclusive
/// advisory lock on `<root>/LOCK` until dropped, so only one process at a
/// time can own the directory.
///
/// # Example
///
/// ```rust
/// use jsonldb_core::{CollectionDir, Config};
/// use serde_json::json;
/// # let tmp = tempfile::tempdir().unwrap();
///
/// let db = CollectionDir::open(tmp.path().join("db"), Config::default()).unwrap();
/// let users = db.collection("users").unwrap();
/// users.add(json!([{"name": "Alice"}, {"name": "Bob"}])).unwrap();
///
/// assert_eq!(users.count_all().unwrap(), 2);
/// assert_eq!(db.collection_names().unwrap(), vec!["users"]);
/// ```
#[derive(Debug)]
pub struct CollectionDir {
    path: PathBuf,
    config: Config,
    stats: Arc<StoreStats>,
    _lock_file: Option<File>,
}

impl CollectionDir {
    /// Opens or creates a collection directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - The path exists but is not a directory
    /// - Another handle holds the lock (returns `DirectoryLocked`)
    /// - I/O errors occur
    pub fn open(path: impl Into<PathBuf>, config: Config) -> CoreResult<Self> {
        let path = path.into();

        if !path.exists() {
            if config.create_if_missing {
                fs::create_dir_all(&path)?;
            } else {
                return Err(CoreError::invalid_format(format!(
                    "collection directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if !path.is_dir() {
            return Err(CoreError::invalid_format(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        let lock_file = if config.lock_directory {
            Some(acquire_lock(&path)?)
        } else {
            None
        };

        tracing::debug!(
            path = %path.display(),
            locked = lock_file.is_some(),
            "opened collection directory"
        );
        Ok(Self {
            path,
            config,
            stats: Arc::new(StoreStats::new()),
            _lock_file: lock_file,
        })
    }

    /// Opens a directory with default configuration.
    ///
    /// # Errors
    ///
    /// See [`CollectionDir::open`].
    pub fn open_default(path: impl Into<PathBuf>) -> CoreResult<Self> {
        Self::open(path, Config::default())
    }

    /// Returns the root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns statistics shared by every collection from this directory.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Returns a handle to the named collection.
    ///
    /// The file is not created until the first write.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCollectionName`] if `name` cannot be
    /// used as a file name.
    pub fn collection(&self, name: &str) -> CoreResult<Collection> {
        validate_name(name)?;
        let file = JsonlFile::with_shared_stats(
            self.collection_path(name),
            self.config.clone(),
            Arc::clone(&self.stats),
        );
        Ok(Collection::new(name.to_string(), file))
    }

    /// Returns a typed handle to the named collection.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCollectionName`] for an invalid name.
    pub fn typed_collection<T>(&self, name: &str) -> CoreResult<TypedCollection<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        Ok(TypedCollection::new(self.collection(name)?))
    }

    /// Lists existing collections, sorted by name.
    ///
    /// Only files carrying the configured extension are included. With an
    /// empty extension every file whose name is a valid collection name is
    /// listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        let suffix = if self.config.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.config.extension)
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let stem = file_name.to_str().and_then(|n| n.strip_suffix(suffix.as_str()));
            // Excludes scratch files and the lock file.
            if let Some(name) = stem.filter(|n| validate_name(n).is_ok()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes the named collection's file.
    ///
    /// Returns false if the collection did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid name or if removal fails.
    pub fn drop_collection(&self, name: &str) -> CoreResult<bool> {
        validate_name(name)?;
        match fs::remove_file(self.collection_path(name)) {
            Ok(()) => {
                tracing::debug!(collection = name, "dropped collection");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        if self.config.extension.is_empty() {
            self.path.join(name)
        } else {
            self.path.join(format!("{name}.{}", self.config.extension))
        }
    }
}

fn acquire_lock(dir: &Path) -> CoreResult<File> {
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(dir.join(LOCK_FILE))?;

    if lock_file.try_lock_exclusive().is_err() {
        return Err(CoreError::DirectoryLocked {
            path: dir.to_path_buf(),
        });
    }
    Ok(lock_file)
}

fn validate_name(name: &str) -> CoreResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.starts_with('.') {
        "name starts with a dot"
    } else if name.eq_ignore_ascii_case(LOCK_FILE) {
        "name is reserved for the lock file"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(CoreError::invalid_collection_name(name, reason))
}
