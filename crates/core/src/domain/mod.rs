// Domain Layer - Pure types shared by the RPC pipeline

pub mod condition;
pub mod error;
pub mod error_code;
pub mod ledger;
pub mod load_type;
pub mod role;

// Re-exports
pub use condition::Condition;
pub use error::DomainError;
pub use error_code::{ErrorCode, Status};
pub use ledger::{ClosedLedger, Headers, JobType, OperatingMode};
pub use load_type::LoadType;
pub use role::Role;

/// Mutable JSON object used for request parameters and result documents
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
