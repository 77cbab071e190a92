//! Test fixtures and store helpers.
//!
//! Provides temporary files and directories that live as long as the
//! fixture, plus helpers for seeding files with exact line content.

use jsonldb_core::{CollectionDir, Config, JsonlFile};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// File name used by [`TestFile`].
pub const TEST_FILE_NAME: &str = "test.jsonl";

/// A JSON Lines file in its own temporary directory.
pub struct TestFile {
    /// The store handle.
    pub file: JsonlFile,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestFile {
    /// Creates a handle for a file that does not exist yet.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a handle with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = JsonlFile::with_config(temp_dir.path().join(TEST_FILE_NAME), config);
        Self { file, temp_dir }
    }

    /// Creates a file holding exactly `lines`, joined by `\n`.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fixture = Self::new();
        write_lines(fixture.path(), lines);
        fixture
    }

    /// Creates a file holding exactly `content`.
    pub fn with_content(content: impl AsRef<[u8]>) -> Self {
        let fixture = Self::new();
        fs::write(fixture.path(), content).expect("Failed to write test file");
        fixture
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the temporary directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the raw file content, or an empty vector if missing.
    pub fn bytes(&self) -> Vec<u8> {
        fs::read(self.path()).unwrap_or_default()
    }

    /// Returns the names of every entry in the temporary directory.
    ///
    /// Useful for checking that no scratch file was left behind.
    pub fn dir_entries(&self) -> Vec<String> {
        dir_entries(self.dir())
    }
}

impl Default for TestFile {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestFile {
    type Target = JsonlFile;

    fn deref(&self) -> &Self::Target {
        &self.file
    }
}

/// A collection directory inside a temporary directory.
pub struct TestDir {
    /// The directory handle.
    pub dir: CollectionDir,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestDir {
    /// Opens a collection directory with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Opens a collection directory with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = CollectionDir::open(temp_dir.path().join("db"), config)
            .expect("Failed to open collection directory");
        Self {
            dir,
            _temp_dir: temp_dir,
        }
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDir {
    type Target = CollectionDir;

    fn deref(&self) -> &Self::Target {
        &self.dir
    }
}

/// Runs a test with a fresh file that does not exist yet.
///
/// # Example
///
/// ```rust
/// use jsonldb_testkit::with_temp_file;
///
/// with_temp_file(|file| {
///     assert_eq!(file.count().unwrap(), 0);
/// });
/// ```
pub fn with_temp_file<F, R>(f: F) -> R
where
    F: FnOnce(&JsonlFile) -> R,
{
    let fixture = TestFile::new();
    f(&fixture.file)
}

/// Runs a test with a fresh collection directory.
pub fn with_temp_dir<F, R>(f: F) -> R
where
    F: FnOnce(&CollectionDir) -> R,
{
    let fixture = TestDir::new();
    f(&fixture.dir)
}

/// Overwrites `path` with `lines` joined by `\n`, without a trailing
/// newline. Lines are written verbatim, so they may be malformed.
pub fn write_lines<I, S>(path: &Path, lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let content = lines
        .into_iter()
        .map(|l| l.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, content).expect("Failed to write lines");
}

/// Returns the sorted names of every entry in `dir`.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| {
            e.expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Creates a file holding `count` records `{"index": i, "even": bool}`.
    pub fn populated_file(count: usize) -> TestFile {
        let fixture = TestFile::new();
        fixture
            .add_many((0..count).map(|i| json!({"index": i, "even": i % 2 == 0})))
            .expect("Failed to populate file");
        fixture
    }

    /// Creates a file mixing valid records with malformed lines.
    ///
    /// Returns the fixture and the number of valid records.
    pub fn mixed_file() -> (TestFile, usize) {
        let fixture = TestFile::with_lines([
            r#"{"name":"Alice","age":25}"#,
            "not-json",
            "",
            "[1,2,3]",
            r#"{"name":"Bob","age":30}"#,
            r#"{"truncated":"#,
            "   ",
            r#"{"name":"Carol","age":35}"#,
        ]);
        (fixture, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_starts_missing() {
        let fixture = TestFile::new();
        assert!(!fixture.path().exists());
        assert!(fixture.bytes().is_empty());
        assert!(fixture.dir_entries().is_empty());
    }

    #[test]
    fn test_file_derefs_to_store() {
        let fixture = TestFile::new();
        fixture.add(json!({"a": 1})).unwrap();
        assert_eq!(fixture.count().unwrap(), 1);
        assert_eq!(fixture.dir_entries(), vec![TEST_FILE_NAME]);
    }

    #[test]
    fn with_lines_is_verbatim() {
        let fixture = TestFile::with_lines(["a", "b"]);
        assert_eq!(fixture.bytes(), b"a\nb");
    }

    #[test]
    fn temp_dir_fixture() {
        with_temp_dir(|dir| {
            dir.collection("users").unwrap().add(json!({})).unwrap();
            assert_eq!(dir.collection_names().unwrap(), vec!["users"]);
        });
    }

    #[test]
    fn scenarios_populate() {
        let fixture = scenarios::populated_file(5);
        assert_eq!(fixture.count().unwrap(), 5);

        let (mixed, valid) = scenarios::mixed_file();
        assert_eq!(mixed.count().unwrap(), valid);
    }
}
