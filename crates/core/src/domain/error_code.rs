//! RPC error taxonomy
//!
//! Names, numeric codes and messages are an external contract:
//! clients match on them, so never renumber a variant.

use super::JsonObject;
use serde_json::Value;
use std::fmt;

/// Stable RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    NoPermission,
    NotStandalone,
    TooBusy,
    AmendmentBlocked,
    NoClosed,
    NoCurrent,
    NoNetwork,
    LgrNotFound,
    InvalidParams,
    UnknownCommand,
    CommandMissing,
    Internal,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::Success,
        ErrorCode::NoPermission,
        ErrorCode::NotStandalone,
        ErrorCode::TooBusy,
        ErrorCode::AmendmentBlocked,
        ErrorCode::NoClosed,
        ErrorCode::NoCurrent,
        ErrorCode::NoNetwork,
        ErrorCode::LgrNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::UnknownCommand,
        ErrorCode::CommandMissing,
        ErrorCode::Internal,
    ];

    pub fn code(self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::NoPermission => 6,
            ErrorCode::NotStandalone => 8,
            ErrorCode::TooBusy => 9,
            ErrorCode::AmendmentBlocked => 14,
            ErrorCode::NoClosed => 15,
            ErrorCode::NoCurrent => 16,
            ErrorCode::NoNetwork => 17,
            ErrorCode::LgrNotFound => 21,
            ErrorCode::InvalidParams => 31,
            ErrorCode::UnknownCommand => 32,
            ErrorCode::CommandMissing => 46,
            ErrorCode::Internal => 73,
        }
    }

    /// Machine-readable error name sent as `error`
    pub fn token(self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::NoPermission => "noPermission",
            ErrorCode::NotStandalone => "notStandalone",
            ErrorCode::TooBusy => "tooBusy",
            ErrorCode::AmendmentBlocked => "amendmentBlocked",
            ErrorCode::NoClosed => "noClosed",
            ErrorCode::NoCurrent => "noCurrent",
            ErrorCode::NoNetwork => "noNetwork",
            ErrorCode::LgrNotFound => "lgrNotFound",
            ErrorCode::InvalidParams => "invalidParams",
            ErrorCode::UnknownCommand => "unknownCmd",
            ErrorCode::CommandMissing => "missingCommand",
            ErrorCode::Internal => "internal",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::NoPermission => "You don't have permission for this command.",
            ErrorCode::NotStandalone => "Operation valid in debug mode only.",
            ErrorCode::TooBusy => "The server is too busy to help you now.",
            ErrorCode::AmendmentBlocked => "Amendment blocked, need upgrade.",
            ErrorCode::NoClosed => "Closed ledger is unavailable.",
            ErrorCode::NoCurrent => "Current ledger is unavailable.",
            ErrorCode::NoNetwork => "Not synced to the network.",
            ErrorCode::LgrNotFound => "Ledger not found.",
            ErrorCode::InvalidParams => "Invalid parameters.",
            ErrorCode::UnknownCommand => "Unknown method.",
            ErrorCode::CommandMissing => "Missing command entry.",
            ErrorCode::Internal => "Internal error.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Outcome of admission or invocation
///
/// `Success` is the only non-failure value. A failure may carry a detail
/// message that replaces the code's default text in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: ErrorCode,
    detail: Option<String>,
}

impl Status {
    pub const OK: Status = Status {
        code: ErrorCode::Success,
        detail: None,
    };

    pub fn new(code: ErrorCode) -> Self {
        Self { code, detail: None }
    }

    pub fn with_detail(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success
    }

    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or_else(|| self.code.message())
    }

    /// Write `error`, `error_code` and `error_message` into `object`
    pub fn inject(&self, object: &mut JsonObject) {
        object.insert("error".into(), Value::from(self.code.token()));
        object.insert("error_code".into(), Value::from(self.code.code()));
        object.insert("error_message".into(), Value::from(self.message()));
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::OK
    }
}

impl From<ErrorCode> for Status {
    fn from(code: ErrorCode) -> Self {
        Status::new(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.token(), self.message())
    }
}
