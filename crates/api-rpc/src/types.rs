//! RPC Request/Response Types
//!
//! Request parameter normalization and the result shapes of the
//! built-in commands.

use ledger_rpc_core::{ErrorCode, JsonObject, Status};
use serde::Serialize;
use serde_json::Value;

/// Normalize JSON-RPC params into the command's parameter object
///
/// Accepts `[{...}]` (the first element is used), `{...}`, an empty
/// array or no params at all.
pub fn request_params(raw: Value) -> Result<JsonObject, Status> {
    match raw {
        Value::Null => Ok(JsonObject::new()),
        Value::Object(map) => Ok(map),
        Value::Array(items) => match items.into_iter().next() {
            None => Ok(JsonObject::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(params_not_object()),
        },
        _ => Err(params_not_object()),
    }
}

fn params_not_object() -> Status {
    Status::with_detail(ErrorCode::InvalidParams, "Params must be an object.")
}

/// server_info - node status summary
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub build_version: String,
    pub server_state: String,
    pub standalone: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub amendment_blocked: bool,
    pub uptime_seconds: u64,
    pub jobs_in_flight: usize,
    pub validated_ledger: Option<ValidatedLedgerInfo>,
    pub closed_ledger: Option<ClosedLedgerInfo>,
    pub current_ledger_index: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidatedLedgerInfo {
    pub seq: u32,
    pub age: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosedLedgerInfo {
    pub seq: u32,
    pub hash: String,
}

/// ledger_current
#[derive(Debug, Clone, Serialize)]
pub struct LedgerCurrentResponse {
    pub ledger_current_index: u32,
}

/// ledger_closed
#[derive(Debug, Clone, Serialize)]
pub struct LedgerClosedResponse {
    pub ledger_index: u32,
    pub ledger_hash: String,
}

/// ledger_accept
#[derive(Debug, Clone, Serialize)]
pub struct LedgerAcceptResponse {
    pub ledger_current_index: u32,
}
