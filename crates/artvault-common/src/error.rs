//! Common error types used throughout artvault.
//!
//! This module provides a unified error type that covers the failure cases of
//! the batch tools and the HTTP front door: missing records, a missing seed
//! store, unparseable store files, and I/O failures.

use std::path::PathBuf;

/// Common error type for artvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "artwork").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The read-only seed store required by the bootstrap does not exist.
    #[error("Seed store not found: {}", .0.display())]
    MissingSeed(PathBuf),

    /// The record store exists but does not have a recognized shape.
    #[error("Invalid record store {}: {}", .path.display(), .message)]
    InvalidStore {
        /// Path of the offending store file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<E: Into<String>, I: Into<String>>(entity: E, id: I) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a new InvalidStore error.
    pub fn invalid_store<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::InvalidStore {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidInput(_) => 400,
            Self::MissingSeed(_)
            | Self::InvalidStore { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::MissingSeed(_) => "missing_seed",
            Self::InvalidStore { .. } => "invalid_store",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
