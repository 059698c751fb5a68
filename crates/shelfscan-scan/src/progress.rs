//! Scan progress and summary reporting.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Totals for a finished (or cancelled) scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Files that produced a file-found event.
    pub matches: u64,
    /// Directories visited (one heartbeat each).
    pub dirs_visited: u64,
    /// Regular files classified, matching or not.
    pub files_seen: u64,
    /// Entries skipped by ignore rules.
    pub entries_ignored: u64,
    /// Error events emitted.
    pub errors: u64,
    /// Bytes read while hashing matches.
    pub bytes_hashed: u64,
    /// Wall time spent scanning.
    pub elapsed: Duration,
    /// Whether the scan stopped early on cancellation.
    pub cancelled: bool,
}

impl ScanSummary {
    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_seen as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate hashing throughput in bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.bytes_hashed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total entries classified (dirs + files + ignored).
    pub fn total_entries(&self) -> u64 {
        self.dirs_visited + self.files_seen + self.entries_ignored
    }
}

/// Internal tracker that accumulates counts during traversal.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    summary: ScanSummary,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            summary: ScanSummary::default(),
        }
    }

    pub fn record_dir(&mut self) {
        self.summary.dirs_visited += 1;
    }

    pub fn record_file(&mut self) {
        self.summary.files_seen += 1;
    }

    pub fn record_ignored(&mut self) {
        self.summary.entries_ignored += 1;
    }

    pub fn record_error(&mut self) {
        self.summary.errors += 1;
    }

    pub fn record_match(&mut self, bytes: u64) {
        self.summary.matches += 1;
        self.summary.bytes_hashed += bytes;
    }

    pub fn finish(mut self, cancelled: bool) -> ScanSummary {
        self.summary.elapsed = self.start_time.elapsed();
        self.summary.cancelled = cancelled;
        self.summary
    }
}
