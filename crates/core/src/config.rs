// RPC admission tuning (No magic values)

use crate::error::{AppError, Result};
use std::time::Duration;

/// Client jobs allowed in the job queue before limited callers get `tooBusy`
pub const MAX_JOB_QUEUE_CLIENTS: usize = 500;

/// Oldest validated ledger still considered current (2 minutes)
pub const MAX_VALIDATED_LEDGER_AGE: Duration = Duration::from_secs(120);

/// How far the working ledger may trail the validated one
pub const MAX_LEDGER_LAG: u32 = 10;

/// Commands running longer than this are logged as slow
pub const SLOW_COMMAND_THRESHOLD: Duration = Duration::from_millis(500);

/// Node configuration consumed by admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// Single-node mode: ledger freshness checks are skipped
    pub standalone: bool,
    pub max_job_queue_clients: usize,
    pub max_validated_ledger_age: Duration,
    pub slow_command_threshold: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            max_job_queue_clients: MAX_JOB_QUEUE_CLIENTS,
            max_validated_ledger_age: MAX_VALIDATED_LEDGER_AGE,
            slow_command_threshold: SLOW_COMMAND_THRESHOLD,
        }
    }
}

impl RpcConfig {
    pub fn standalone() -> Self {
        Self {
            standalone: true,
            ..Self::default()
        }
    }

    /// Reject thresholds that would make every request fail admission
    pub fn validate(&self) -> Result<()> {
        if self.max_job_queue_clients == 0 {
            return Err(AppError::Config(
                "max_job_queue_clients must be greater than zero".to_string(),
            ));
        }
        if self.max_validated_ledger_age.is_zero() {
            return Err(AppError::Config(
                "max_validated_ledger_age must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
