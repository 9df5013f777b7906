// Ledger RPC Infrastructure - In-process node state adapters
// Implements: JobQueue, NetworkOps, LedgerMaster, PerfLog

pub mod job_counter;
pub mod ledger_tracker;
pub mod network_state;
pub mod perf_log;

pub use job_counter::{InFlightJobQueue, JobGuard};
pub use ledger_tracker::LedgerTracker;
pub use network_state::NetworkState;
pub use perf_log::{MethodCounters, TracingPerfLog};
