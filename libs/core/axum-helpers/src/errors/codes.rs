//! Error codes carried in every [`ErrorResponse`](super::ErrorResponse).
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Conflict;
//! assert_eq!(code.as_str(), "CONFLICT");
//! assert_eq!(code.code(), 1008);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error identifiers shared by all endpoints.
///
/// Integer ranges: 1000s for client and generic server errors, 2000s for database errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body failed validation
    ValidationError,

    /// Path identifier is not a valid integer
    InvalidId,

    /// Request body could not be parsed
    JsonExtraction,

    NotFound,

    InternalError,

    /// Request is well-formed but violates a business rule
    BadRequest,

    /// Request conflicts with the current state of the resource
    Conflict,

    ServiceUnavailable,

    /// Query or connection failure
    DatabaseError,

    DatabasePoolTimeout,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
        }
    }

    /// Integer code used in structured logs
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadRequest => 1006,
            Self::Conflict => 1008,
            Self::ServiceUnavailable => 1011,
            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::BadRequest => "Bad request",
            Self::Conflict => "Request conflicts with the current resource state",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
