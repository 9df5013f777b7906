// Caller authorization levels

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Authorization level of an RPC caller
///
/// Handlers declare either `User` (anyone may call) or `Admin`.
/// `Forbid` is never granted; it is what [`crate::role_required`]
/// reports for commands that do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    User,
    Identified,
    Admin,
    Proxy,
    Forbid,
}

impl Role {
    /// Callers exempt from load shedding
    pub fn is_unlimited(self) -> bool {
        matches!(self, Role::Admin | Role::Identified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Identified => "identified",
            Role::Admin => "admin",
            Role::Proxy => "proxy",
            Role::Forbid => "forbid",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "identified" => Ok(Role::Identified),
            "admin" => Ok(Role::Admin),
            "proxy" => Ok(Role::Proxy),
            "forbid" => Ok(Role::Forbid),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}
