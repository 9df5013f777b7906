// In-flight job accounting
// Uses atomic counters so load queries never contend with request handling

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use ledger_rpc_core::domain::JobType;
use ledger_rpc_core::port::{JobQueue, LoadEvent};

/// Job queue that counts work currently in progress, per job class
///
/// Transports call [`InFlightJobQueue::begin`] for each request; the
/// returned guard keeps the job counted until it is dropped.
#[derive(Debug)]
pub struct InFlightJobQueue {
    counts: Arc<[AtomicUsize; JobType::COUNT]>,
    slow_threshold: Duration,
}

impl InFlightJobQueue {
    pub fn new(slow_threshold: Duration) -> Self {
        Self {
            counts: Arc::new(std::array::from_fn(|_| AtomicUsize::new(0))),
            slow_threshold,
        }
    }

    /// Count one job of `job_type` until the guard drops
    pub fn begin(&self, job_type: JobType) -> JobGuard {
        let depth = self.counts[job_type.index()].fetch_add(1, Ordering::AcqRel) + 1;
        trace!(job_type = ?job_type, depth, "Job started");
        JobGuard {
            counts: Arc::clone(&self.counts),
            job_type,
        }
    }

    /// Jobs of exactly `job_type` in flight
    pub fn count(&self, job_type: JobType) -> usize {
        self.counts[job_type.index()].load(Ordering::Acquire)
    }
}

impl JobQueue for InFlightJobQueue {
    fn job_count_ge(&self, job_type: JobType) -> usize {
        JobType::ALL
            .iter()
            .filter(|t| **t >= job_type)
            .map(|t| self.count(*t))
            .sum()
    }

    fn make_load_event(&self, job_type: JobType, name: String) -> LoadEvent {
        LoadEvent::new(job_type, name, self.slow_threshold)
    }
}

/// Keeps one job counted while alive
#[derive(Debug)]
pub struct JobGuard {
    counts: Arc<[AtomicUsize; JobType::COUNT]>,
    job_type: JobType,
}

impl JobGuard {
    pub fn job_type(&self) -> JobType {
        self.job_type
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.counts[self.job_type.index()].fetch_sub(1, Ordering::AcqRel);
    }
}
