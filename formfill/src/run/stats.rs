//! Aggregate run statistics.
//!
//! The stage transforms are the only writers; anything holding a handle may
//! snapshot at any time, including mid-run. Counters are atomics because
//! transforms settle on a multi-threaded runtime - there is no
//! single-logical-thread invariant to lean on here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Read-only snapshot of a run's aggregate statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of candidates in the run's range.
    pub total: u64,
    pub generated_ok: u64,
    pub generated_err: u64,
    pub written_ok: u64,
    pub written_err: u64,
    pub skipped_gen: u64,
    pub skipped_write: u64,
    /// Set when the run starts; `None` before the first run.
    pub started_at: Option<Instant>,
    /// Set exactly once when the run completes or aborts.
    pub ended_at: Option<Instant>,
}

impl RunStats {
    /// Wall-clock duration of the run so far, or of the whole run once
    /// terminated.
    pub fn elapsed(&self) -> Option<Duration> {
        let started = self.started_at?;
        Some(match self.ended_at {
            Some(ended) => ended.duration_since(started),
            None => started.elapsed(),
        })
    }
}

#[derive(Debug, Default)]
struct Timing {
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

/// Shared mutable statistics for the run in progress.
#[derive(Debug, Default)]
pub(super) struct RunProgress {
    total: AtomicU64,
    generated_ok: AtomicU64,
    generated_err: AtomicU64,
    written_ok: AtomicU64,
    written_err: AtomicU64,
    skipped_gen: AtomicU64,
    skipped_write: AtomicU64,
    timing: RwLock<Timing>,
}

impl RunProgress {
    /// Zeroes all counters and stamps the start time.
    pub(super) fn reset(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.generated_ok.store(0, Ordering::Relaxed);
        self.generated_err.store(0, Ordering::Relaxed);
        self.written_ok.store(0, Ordering::Relaxed);
        self.written_err.store(0, Ordering::Relaxed);
        self.skipped_gen.store(0, Ordering::Relaxed);
        self.skipped_write.store(0, Ordering::Relaxed);
        let mut timing = self.timing.write().expect("timing lock poisoned");
        timing.started_at = Some(Instant::now());
        timing.ended_at = None;
    }

    /// Stamps the end time, freezing the snapshot's elapsed duration.
    pub(super) fn finish(&self) {
        let mut timing = self.timing.write().expect("timing lock poisoned");
        timing.ended_at = Some(Instant::now());
    }

    pub(super) fn generate_ok(&self) {
        self.generated_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn generate_err(&self) {
        self.generated_err.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn generate_skipped(&self) {
        self.skipped_gen.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn write_ok(&self) {
        self.written_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn write_err(&self) {
        self.written_err.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn write_skipped(&self) {
        self.skipped_write.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self) -> RunStats {
        let timing = self.timing.read().expect("timing lock poisoned");
        RunStats {
            total: self.total.load(Ordering::Relaxed),
            generated_ok: self.generated_ok.load(Ordering::Relaxed),
            generated_err: self.generated_err.load(Ordering::Relaxed),
            written_ok: self.written_ok.load(Ordering::Relaxed),
            written_err: self.written_err.load(Ordering::Relaxed),
            skipped_gen: self.skipped_gen.load(Ordering::Relaxed),
            skipped_write: self.skipped_write.load(Ordering::Relaxed),
            started_at: timing.started_at,
            ended_at: timing.ended_at,
        }
    }
}
