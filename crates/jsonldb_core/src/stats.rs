//! Store statistics.
//!
//! Counters for monitoring how a file or collection directory is used.
//! A [`crate::CollectionDir`] shares one `StoreStats` with every
//! collection it hands out.
//!
//! # Usage
//!
//! ```rust
//! use jsonldb_core::JsonlFile;
//! use serde_json::json;
//! # let dir = tempfile::tempdir().unwrap();
//!
//! let file = JsonlFile::new(dir.path().join("users.jsonl"));
//! file.add(json!({"name": "Alice"})).unwrap();
//! file.count().unwrap();
//!
//! let stats = file.stats().snapshot();
//! assert_eq!(stats.records_appended, 1);
//! assert_eq!(stats.scans, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Store statistics.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    // Read counters
    /// Total number of traversals started.
    scans: AtomicU64,
    /// Total number of records decoded.
    records_read: AtomicU64,
    /// Total number of lines skipped as malformed.
    malformed_lines: AtomicU64,

    // Write counters
    /// Total number of append operations.
    appends: AtomicU64,
    /// Total number of records appended.
    records_appended: AtomicU64,
    /// Total number of committed rewrites.
    rewrites: AtomicU64,
    /// Total number of records written by rewrites.
    records_rewritten: AtomicU64,
    /// Total number of rewrites abandoned before commit.
    rewrites_aborted: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.records_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_malformed(&self) {
        self.malformed_lines.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_append(&self, records: u64) {
        self.appends.fetch_add(1, Ordering::Relaxed);
        self.records_appended.fetch_add(records, Ordering::Relaxed);
    }

    pub(crate) fn record_rewrite(&self, records: u64) {
        self.rewrites.fetch_add(1, Ordering::Relaxed);
        self.records_rewritten.fetch_add(records, Ordering::Relaxed);
    }

    pub(crate) fn record_rewrite_abort(&self) {
        self.rewrites_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the total number of traversals started.
    pub fn scans(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// Returns the total number of records decoded.
    pub fn records_read(&self) -> u64 {
        self.records_read.load(Ordering::Relaxed)
    }

    /// Returns the total number of malformed lines skipped.
    ///
    /// A malformed line is counted every time a traversal passes it.
    pub fn malformed_lines(&self) -> u64 {
        self.malformed_lines.load(Ordering::Relaxed)
    }

    /// Returns the total number of append operations.
    pub fn appends(&self) -> u64 {
        self.appends.load(Ordering::Relaxed)
    }

    /// Returns the total number of records appended.
    pub fn records_appended(&self) -> u64 {
        self.records_appended.load(Ordering::Relaxed)
    }

    /// Returns the total number of committed rewrites.
    pub fn rewrites(&self) -> u64 {
        self.rewrites.load(Ordering::Relaxed)
    }

    /// Returns the total number of records written by rewrites.
    pub fn records_rewritten(&self) -> u64 {
        self.records_rewritten.load(Ordering::Relaxed)
    }

    /// Returns the total number of rewrites abandoned before commit.
    pub fn rewrites_aborted(&self) -> u64 {
        self.rewrites_aborted.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            scans: self.scans(),
            records_read: self.records_read(),
            malformed_lines: self.malformed_lines(),
            appends: self.appends(),
            records_appended: self.records_appended(),
            rewrites: self.rewrites(),
            records_rewritten: self.records_rewritten(),
            rewrites_aborted: self.rewrites_aborted(),
        }
    }
}

/// A point-in-time snapshot of store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Total number of traversals started.
    pub scans: u64,
    /// Total number of records decoded.
    pub records_read: u64,
    /// Total number of malformed lines skipped.
    pub malformed_lines: u64,
    /// Total number of append operations.
    pub appends: u64,
    /// Total number of records appended.
    pub records_appended: u64,
    /// Total number of committed rewrites.
    pub rewrites: u64,
    /// Total number of records written by rewrites.
    pub records_rewritten: u64,
    /// Total number of rewrites abandoned before commit.
    pub rewrites_aborted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = StoreStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = StoreStats::new();

        stats.record_scan();
        stats.record_read();
        stats.record_read();
        stats.record_malformed();
        stats.record_append(3);
        stats.record_append(2);

        assert_eq!(stats.scans(), 1);
        assert_eq!(stats.records_read(), 2);
        assert_eq!(stats.malformed_lines(), 1);
        assert_eq!(stats.appends(), 2);
        assert_eq!(stats.records_appended(), 5);
    }

    #[test]
    fn snapshot() {
        let stats = StoreStats::new();
        stats.record_rewrite(10);
        stats.record_rewrite_abort();

        let snap = stats.snapshot();
        assert_eq!(snap.rewrites, 1);
        assert_eq!(snap.records_rewritten, 10);
        assert_eq!(snap.rewrites_aborted, 1);
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(StoreStats::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let s = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    s.record_read();
                    s.record_append(1);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.records_read(), 1000);
        assert_eq!(stats.records_appended(), 1000);
    }
}
