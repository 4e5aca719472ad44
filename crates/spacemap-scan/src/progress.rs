//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use spacemap_core::TreeStats;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Directories expanded so far.
    pub dirs_scanned: u64,
    /// Non-directory entries seen so far.
    pub files_scanned: u64,
    /// Bytes attributed to files seen so far.
    pub bytes_scanned: i64,
    /// Directory most recently expanded.
    pub current_path: PathBuf,
    /// Failures recorded so far.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            dirs_scanned: 0,
            files_scanned: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in directories per second.
    pub fn dirs_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.dirs_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder-side bookkeeping for progress snapshots.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    interval: u64,
    bytes_scanned: i64,
}

impl ProgressTracker {
    pub fn new(interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            interval: interval.max(1),
            bytes_scanned: 0,
        }
    }

    pub fn record_bytes(&mut self, size: i64) {
        self.bytes_scanned = self.bytes_scanned.saturating_add(size);
    }

    /// Whether a snapshot is due after `dirs` expansions.
    pub fn is_due(&self, dirs: u64) -> bool {
        dirs % self.interval == 0
    }

    pub fn snapshot(&self, stats: &TreeStats, errors_count: u64, current_path: &Path) -> ScanProgress {
        ScanProgress {
            dirs_scanned: stats.total_dirs,
            files_scanned: stats.total_files,
            bytes_scanned: self.bytes_scanned,
            current_path: current_path.to_path_buf(),
            errors_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}
