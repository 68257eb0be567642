//! Centralized error types for the Conan core library.
//!
//! This module provides a unified error handling system that:
//! - Defines structured error types using `thiserror`
//! - Maps errors to appropriate HTTP status codes
//! - Implements `IntoResponse` for automatic JSON error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::beefweb::{RemoteError, TrackError};

/// Trait for error types that provide machine-readable error codes.
///
/// The sync engine tags its failure logs with these codes.
pub trait ErrorCode {
    /// Returns a stable, machine-readable error code.
    fn code(&self) -> &'static str;
}

impl ErrorCode for RemoteError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::Decode(_) => "decode_failed",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }
}

impl ErrorCode for TrackError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedRecord(_) => "malformed_record",
            Self::InvalidTrackNumber(_) => "invalid_track_number",
            Self::InvalidTotalTracks(_) => "invalid_total_tracks",
        }
    }
}

/// Application-wide error type for the Conan server.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ConanError {
    /// A required background service is not running.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConanError {
    /// Returns a machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "service_unavailable",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) | Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

pub use crate::beefweb::RemoteResult;

/// Convenient Result alias for application-wide operations.
pub type ConanResult<T> = Result<T, ConanError>;

/// JSON response body for error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    status: u16,
}

impl IntoResponse for ConanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
