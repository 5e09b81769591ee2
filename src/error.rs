//! Error handling for the Waman content client

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::{ContactStatus, ContentKind};

/// Unified error type for the content client
#[derive(Error, Debug)]
pub enum Error {
    /// The server could not be reached (offline, DNS, refused connection)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Client-side validation failed, nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The addressed record does not exist
    #[error("{kind} #{id} not found")]
    NotFound { kind: ContentKind, id: i64 },

    /// The call did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Contact messages only move forward through their statuses
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ContactStatus,
        to: ContactStatus,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new server error
    pub fn server<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Server {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// True for failures where retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout(_) => true,
            Error::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Error::Validation(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
