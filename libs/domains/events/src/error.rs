use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(i64),

    #[error("Event {0} is full")]
    Full(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<sea_orm::DbErr> for EventError {
    fn from(err: sea_orm::DbErr) -> Self {
        EventError::Internal(format!("Database error: {}", err))
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            EventError::Full(id) => AppError::Conflict(format!("Event {} is full", id)),
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
