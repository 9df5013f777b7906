//! RPC Error Types
//!
//! Maps pipeline statuses to JSON-RPC error objects for failures that
//! happen before a request reaches the dispatcher.

use jsonrpsee::types::ErrorObjectOwned;
use ledger_rpc_core::{ErrorCode, JsonObject, Status};
use thiserror::Error;

/// JSON-RPC 2.0 reserved codes
pub mod code {
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Errors raised while building the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register method {method}: {reason}")]
    Register { method: String, reason: String },
}

/// Convert a status to a JSON-RPC error carrying the ledger error fields as data
pub fn to_rpc_error(status: &Status) -> ErrorObjectOwned {
    let rpc_code = match status.code() {
        ErrorCode::InvalidParams => code::INVALID_PARAMS,
        _ => code::INTERNAL_ERROR,
    };
    let mut data = JsonObject::new();
    status.inject(&mut data);
    ErrorObjectOwned::owned(rpc_code, status.message().to_string(), Some(data))
}
