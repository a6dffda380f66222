//! Scan statistics with atomic counters.
//!
//! [`ScanStats`] is shared by the walkers and probe workers of a single scan.
//! Counters use relaxed ordering since they are only read for display and
//! reporting after (or while) the scan runs.
//!
//! ```
//! use gs_scanner::ScanStats;
//!
//! let stats = ScanStats::new();
//! stats.increment_visited();
//! stats.increment_candidates();
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.directories_visited, 1);
//! assert_eq!(snapshot.candidates, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for one scan.
#[derive(Debug, Default)]
pub struct ScanStats {
    directories_visited: AtomicU64,
    directories_pruned: AtomicU64,
    candidates: AtomicU64,
    probed: AtomicU64,
    failed: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a directory the walker read.
    #[inline]
    pub fn increment_visited(&self) {
        self.directories_visited.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a directory skipped by the ignore matcher.
    #[inline]
    pub fn increment_pruned(&self) {
        self.directories_pruned.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a directory emitted as a repository candidate.
    #[inline]
    pub fn increment_candidates(&self) {
        self.candidates.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a successful probe.
    #[inline]
    pub fn increment_probed(&self) {
        self.probed.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a failed probe.
    #[inline]
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            directories_visited: self.directories_visited.load(Ordering::Relaxed),
            directories_pruned: self.directories_pruned.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            probed: self.probed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Directories read by the walkers.
    pub directories_visited: u64,
    /// Directories skipped by the ignore matcher.
    pub directories_pruned: u64,
    /// Distinct repository candidates found. Each canonical path counts once,
    /// even when roots overlap.
    pub candidates: u64,
    /// Repositories probed successfully.
    pub probed: u64,
    /// Repositories whose probe failed.
    pub failed: u64,
}

impl StatsSnapshot {
    /// Probes finished so far, successful or not.
    #[inline]
    #[must_use]
    pub const fn finished(&self) -> u64 {
        self.probed + self.failed
    }
}
