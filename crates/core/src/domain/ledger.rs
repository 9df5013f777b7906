// Node state value types observed by the RPC pipeline

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network operating mode, ordered from least to most synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Disconnected,
    Connected,
    Syncing,
    Tracking,
    Full,
}

impl OperatingMode {
    pub const ALL: [OperatingMode; 5] = [
        OperatingMode::Disconnected,
        OperatingMode::Connected,
        OperatingMode::Syncing,
        OperatingMode::Tracking,
        OperatingMode::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Disconnected => "disconnected",
            OperatingMode::Connected => "connected",
            OperatingMode::Syncing => "syncing",
            OperatingMode::Tracking => "tracking",
            OperatingMode::Full => "full",
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownOperatingMode(s.to_string()))
    }
}

/// Job classes tracked by the node's job queue
///
/// Ordering matters: a load query for `Client` counts every class
/// at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobType {
    LedgerRequest,
    Client,
    Rpc,
    Transaction,
    Advance,
    Generic,
}

impl JobType {
    pub const COUNT: usize = 6;

    pub const ALL: [JobType; Self::COUNT] = [
        JobType::LedgerRequest,
        JobType::Client,
        JobType::Rpc,
        JobType::Transaction,
        JobType::Advance,
        JobType::Generic,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of the most recently closed ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedLedger {
    pub seq: u32,
    pub hash: String,
    pub close_time_ms: i64,
}

/// Caller identity metadata from a fronting proxy, used for audit logging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    pub user: String,
    pub forwarded_for: String,
}

impl Headers {
    pub fn new(user: impl Into<String>, forwarded_for: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            forwarded_for: forwarded_for.into(),
        }
    }

    pub fn is_identified(&self) -> bool {
        !self.user.is_empty() || !self.forwarded_for.is_empty()
    }
}
