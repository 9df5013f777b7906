// Tracing-backed performance log
// Emits start/finish/error events on the `perf` target and keeps per-command counters

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use ledger_rpc_core::port::PerfLog;

/// Per-command invocation counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodCounters {
    pub started: u64,
    pub finished: u64,
    pub errored: u64,
    pub total_duration_us: u64,
}

impl MethodCounters {
    pub fn in_flight(&self) -> u64 {
        self.started.saturating_sub(self.finished + self.errored)
    }
}

#[derive(Default)]
struct PerfState {
    counters: HashMap<String, MethodCounters>,
    in_flight: HashMap<u64, Instant>,
}

#[derive(Default)]
pub struct TracingPerfLog {
    state: Mutex<PerfState>,
}

impl TracingPerfLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for every command seen so far, keyed by command name
    pub fn snapshot(&self) -> BTreeMap<String, MethodCounters> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .counters
            .iter()
            .map(|(name, counters)| (name.clone(), counters.clone()))
            .collect()
    }

    fn complete(&self, method: &str, request_id: u64, failed: bool) -> Option<Duration> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = state.in_flight.remove(&request_id).map(|t| t.elapsed());
        let counters = state.counters.entry(method.to_string()).or_default();
        if failed {
            counters.errored += 1;
        } else {
            counters.finished += 1;
        }
        if let Some(elapsed) = elapsed {
            counters.total_duration_us += u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        }
        elapsed
    }
}

impl PerfLog for TracingPerfLog {
    fn rpc_start(&self, method: &str, request_id: u64) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.in_flight.insert(request_id, Instant::now());
            state.counters.entry(method.to_string()).or_default().started += 1;
        }
        debug!(target: "perf", method, request_id, "rpc start");
    }

    fn rpc_finish(&self, method: &str, request_id: u64) {
        let elapsed = self.complete(method, request_id, false);
        debug!(
            target: "perf",
            method,
            request_id,
            duration_us = elapsed.map(|d| d.as_micros() as u64),
            "rpc finish"
        );
    }

    fn rpc_error(&self, method: &str, request_id: u64) {
        let elapsed = self.complete(method, request_id, true);
        warn!(
            target: "perf",
            method,
            request_id,
            duration_us = elapsed.map(|d| d.as_micros() as u64),
            "rpc error"
        );
    }
}
