// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown operating mode: {0}")]
    UnknownOperatingMode(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
