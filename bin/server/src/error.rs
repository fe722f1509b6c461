//! Domain error types for server operations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use std::path::PathBuf;

/// Errors that stop the server from starting.
#[derive(Debug)]
pub enum StartupError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// A data file could not be read.
    Read { path: PathBuf, details: String },
    /// The policy document is invalid.
    Policy { path: PathBuf, details: String },
    /// The seed file is invalid.
    Seed { path: PathBuf, details: String },
    /// The listener could not be bound or the server failed.
    Serve { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {}", details),
            Self::Read { path, details } => {
                write!(f, "failed to read '{}': {}", path.display(), details)
            }
            Self::Policy { path, details } => {
                write!(f, "invalid policy in '{}': {}", path.display(), details)
            }
            Self::Seed { path, details } => {
                write!(f, "invalid seed data in '{}': {}", path.display(), details)
            }
            Self::Serve { details } => write!(f, "server error: {}", details),
        }
    }
}

impl std::error::Error for StartupError {}

/// Errors returned from request handlers.
///
/// Internal errors never carry detail in the response; the cause is logged
/// where the error is raised.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be parsed.
    BadRequest { details: String },
    /// The decision could not be made.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest { details } => (StatusCode::BAD_REQUEST, details).into_response(),
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
