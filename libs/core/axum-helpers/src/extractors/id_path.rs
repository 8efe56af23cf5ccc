//! Integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extracts a single `i64` path parameter.
///
/// A non-integer segment is rejected with 400 `INVALID_ID` instead of
/// axum's plain-text path rejection.
///
/// ```ignore
/// async fn get_event(IdPath(id): IdPath) -> String {
///     format!("Event {id}")
/// }
///
/// let app = Router::new().route("/events/{id}", get(get_event));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidId(e.body_text()))?;

        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidId(format!("Invalid id '{}': expected an integer", raw)))
    }
}
