//! Concurrency-safe scan progress tracking.
//!
//! A [`ProgressTracker`] is an explicitly owned counter handed to verifier
//! workers by `Arc` handle, never a hidden module-level global, so
//! concurrent test runs stay isolated. Workers call [`increment`] once per
//! processed handle; a display loop reads [`snapshot`] on its own schedule
//! and renders without ever gating pipeline state.
//!
//! [`increment`]: ProgressTracker::increment
//! [`snapshot`]: ProgressTracker::snapshot

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared progress state for one scan run.
#[derive(Debug)]
pub struct ProgressTracker {
    processed: AtomicU64,
    total: u64,
    started: Instant,
}

impl ProgressTracker {
    /// Create a tracker for a scan of `total` handles, starting the clock now.
    pub fn new(total: u64) -> Self {
        Self {
            processed: AtomicU64::new(0),
            total,
            started: Instant::now(),
        }
    }

    /// Record one fully processed handle (pass or fail).
    ///
    /// Safe to call from any number of workers concurrently; no updates are
    /// lost.
    pub fn increment(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of handles processed so far.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Number of handles this scan covers.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Capture a point-in-time view for rendering.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed: self.processed(),
            total: self.total,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Point-in-time progress view with derived rate figures.
///
/// All derivations guard their denominators: a snapshot taken before any
/// work happened yields `None` for speed and ETA instead of dividing by
/// zero.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot {
    /// Handles processed when the snapshot was taken
    pub processed: u64,

    /// Handles the scan covers
    pub total: u64,

    /// Wall-clock time since the tracker was created
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Completion percentage in `[0, 100]`.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 * 100.0 / self.total as f64
    }

    /// Processing rate in handles per second, or `None` while unknown.
    pub fn speed(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        if secs < 1e-3 || self.processed == 0 {
            return None;
        }
        Some(self.processed as f64 / secs)
    }

    /// Estimated time until completion, or `None` while unknown.
    pub fn eta(&self) -> Option<Duration> {
        let speed = self.speed()?;
        if speed <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.processed) as f64;
        Some(Duration::from_secs_f64(remaining / speed))
    }

    /// Whether every handle has been processed.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_no_lost_updates_under_contention() {
        const WORKERS: u64 = 64;
        const TOTAL: u64 = 100_000;

        let tracker = Arc::new(ProgressTracker::new(TOTAL));
        let mut threads = Vec::with_capacity(WORKERS as usize);

        // Split TOTAL increments across the workers, remainder on the early ones
        for i in 0..WORKERS {
            let share = TOTAL / WORKERS + u64::from(i < TOTAL % WORKERS);
            let tracker = tracker.clone();
            threads.push(std::thread::spawn(move || {
                for _ in 0..share {
                    tracker.increment();
                }
            }));
        }
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(tracker.processed(), TOTAL);
    }

    #[test]
    fn test_zero_elapsed_yields_unknown_not_panic() {
        let snap = ProgressSnapshot {
            processed: 0,
            total: 1000,
            elapsed: Duration::ZERO,
        };
        assert_eq!(snap.speed(), None);
        assert_eq!(snap.eta(), None);
        assert_eq!(snap.percentage(), 0.0);
    }

    #[test]
    fn test_zero_total_does_not_divide_by_zero() {
        let snap = ProgressSnapshot {
            processed: 0,
            total: 0,
            elapsed: Duration::from_secs(1),
        };
        assert_eq!(snap.percentage(), 100.0);
        assert!(snap.is_complete());
    }

    #[test]
    fn test_derived_figures() {
        let snap = ProgressSnapshot {
            processed: 500,
            total: 2000,
            elapsed: Duration::from_secs(10),
        };
        assert_eq!(snap.percentage(), 25.0);
        assert_eq!(snap.speed(), Some(50.0));
        assert_eq!(snap.eta(), Some(Duration::from_secs(30)));
        assert!(!snap.is_complete());
    }

    #[test]
    fn test_eta_at_completion_is_zero() {
        let snap = ProgressSnapshot {
            processed: 100,
            total: 100,
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(snap.eta(), Some(Duration::ZERO));
        assert!(snap.is_complete());
    }
}
