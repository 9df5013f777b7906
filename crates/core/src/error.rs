// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Only startup and wiring paths return these. Request handling reports
/// failures as [`crate::Status`] values instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate handler: {0}")]
    DuplicateHandler(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
