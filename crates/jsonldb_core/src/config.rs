//! Store configuration.

/// Default batch size for [`crate::JsonlFile::batches_default`].
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default file extension for collection files.
pub const DEFAULT_EXTENSION: &str = "jsonl";

/// Configuration for files and collection directories.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create a collection directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether the first write creates missing parent directories.
    pub create_parent_dirs: bool,

    /// Whether to sync appends and rewrites to disk (safer but slower).
    pub sync_writes: bool,

    /// Whether rewrites copy undecodable lines verbatim instead of
    /// dropping them.
    pub keep_malformed_lines: bool,

    /// Whether a collection directory holds an exclusive advisory lock.
    pub lock_directory: bool,

    /// Batch size used when none is given.
    pub default_batch_size: usize,

    /// File extension for collection files, without the dot.
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            create_parent_dirs: true,
            sync_writes: false,
            keep_malformed_lines: false,
            lock_directory: false,
            default_batch_size: DEFAULT_BATCH_SIZE,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create a collection directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether the first write creates parent directories.
    #[must_use]
    pub const fn create_parent_dirs(mut self, value: bool) -> Self {
        self.create_parent_dirs = value;
        self
    }

    /// Sets whether writes are synced to disk.
    #[must_use]
    pub const fn sync_writes(mut self, value: bool) -> Self {
        self.sync_writes = value;
        self
    }

    /// Sets whether rewrites keep malformed lines.
    #[must_use]
    pub const fn keep_malformed_lines(mut self, value: bool) -> Self {
        self.keep_malformed_lines = value;
        self
    }

    /// Sets whether a collection directory takes an exclusive lock.
    #[must_use]
    pub const fn lock_directory(mut self, value: bool) -> Self {
        self.lock_directory = value;
        self
    }

    /// Sets the default batch size.
    #[must_use]
    pub const fn default_batch_size(mut self, size: usize) -> Self {
        self.default_batch_size = size;
        self
    }

    /// Sets the collection file extension.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
