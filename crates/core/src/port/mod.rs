// Port Layer - Read-only node services consumed by the RPC pipeline

pub mod job_queue;
pub mod ledger_master;
pub mod network_ops;
pub mod perf_log;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use job_queue::{JobQueue, LoadEvent};
pub use ledger_master::LedgerMaster;
pub use network_ops::NetworkOps;
pub use perf_log::PerfLog;
pub use time_provider::TimeProvider;
