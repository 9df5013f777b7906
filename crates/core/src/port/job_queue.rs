// Job Queue Port
// Only the load-depth query and load events are used by the RPC pipeline

use crate::config::SLOW_COMMAND_THRESHOLD;
use crate::domain::JobType;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Job queue port
pub trait JobQueue: Send + Sync {
    /// Number of queued or running jobs whose class is at or above `job_type`
    fn job_count_ge(&self, job_type: JobType) -> usize;

    /// Start timing a unit of work; the returned guard reports on drop
    fn make_load_event(&self, job_type: JobType, name: String) -> LoadEvent {
        LoadEvent::new(job_type, name, SLOW_COMMAND_THRESHOLD)
    }
}

/// Timing guard for one unit of work
///
/// Logs the elapsed time when dropped, at `warn` if it exceeded the
/// slow threshold.
#[derive(Debug)]
pub struct LoadEvent {
    job_type: JobType,
    name: String,
    started: Instant,
    slow_threshold: Duration,
}

impl LoadEvent {
    pub fn new(job_type: JobType, name: String, slow_threshold: Duration) -> Self {
        Self {
            job_type,
            name,
            started: Instant::now(),
            slow_threshold,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }
}

impl Drop for LoadEvent {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if elapsed > self.slow_threshold {
            warn!(
                job_type = ?self.job_type,
                name = %self.name,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow job"
            );
        } else {
            debug!(
                job_type = ?self.job_type,
                name = %self.name,
                elapsed_us = elapsed.as_micros() as u64,
                "Job finished"
            );
        }
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Job queue reporting a fixed client depth
    pub struct MockJobQueue {
        depth: AtomicUsize,
        queries: AtomicUsize,
    }

    impl MockJobQueue {
        pub fn new(depth: usize) -> Self {
            Self {
                depth: AtomicUsize::new(depth),
                queries: AtomicUsize::new(0),
            }
        }

        pub fn set_depth(&self, depth: usize) {
            self.depth.store(depth, Ordering::SeqCst);
        }

        /// How many times the depth was queried
        pub fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl JobQueue for MockJobQueue {
        fn job_count_ge(&self, _job_type: JobType) -> usize {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.depth.load(Ordering::SeqCst)
        }
    }
}
