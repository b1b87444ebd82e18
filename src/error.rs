//! Error types for the kodi-cutter-utils library.
//!
//! This module provides custom error types using `thiserror`. Data-access
//! failures on the bookmark store never reach callers as errors; they are
//! logged and degrade to empty results (see [`crate::repository`]). The
//! variants here cover what does propagate: malformed recording URLs,
//! backend transport and parse failures, and configuration problems.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur in the kodi-cutter-utils library.
#[derive(Error, Debug)]
pub enum CutterError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input that does not follow the expected grammar
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Network or protocol failure talking to a remote endpoint
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON that could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The recording backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Backend {
        /// HTTP status returned by the backend
        status: StatusCode,
        /// Response body, as text
        body: String,
    },

    /// The host answered a JSON-RPC call with an error object
    #[error("JSON-RPC error: {0}")]
    JsonRpc(String),

    /// CSV rendering errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with CutterError
pub type Result<T> = std::result::Result<T, CutterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_message() {
        let err = CutterError::MalformedInput("missing .pvr suffix".to_string());
        assert_eq!(err.to_string(), "Malformed input: missing .pvr suffix");
    }

    #[test]
    fn test_backend_error_message() {
        let err = CutterError::Backend {
            status: StatusCode::UNAUTHORIZED,
            body: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 401 Unauthorized: denied");
    }
}
