use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Errors produced by the review-queue core. These are deliberately separate
/// from [`AppError`]: the queue and scheduler are pure and unit-testable
/// without any web or database machinery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("review queue has no questions")]
    EmptyQueue,

    #[error("question '{0}' is not the current question")]
    StaleAnswer(String),

    #[error("slot index {index} out of range for queue of {len} nodes")]
    InvalidIndex { index: u32, len: usize },

    #[error("review queue is malformed: {0}")]
    MalformedQueue(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Queue(queue_error) => match queue_error {
                // Recoverable by the client: fetch again once the bank is seeded.
                QueueError::EmptyQueue => StatusCode::NOT_FOUND,
                // Client answered a question that is no longer at the head;
                // it should refetch the current question and retry.
                QueueError::StaleAnswer(_) => StatusCode::CONFLICT,
                // Corrupted persisted state. Surfaced, never silently repaired.
                QueueError::InvalidIndex { .. } | QueueError::MalformedQueue(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyExists("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("test".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_queue_error_status_codes() {
        assert_eq!(
            AppError::from(QueueError::EmptyQueue).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(QueueError::StaleAnswer("abc".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(QueueError::InvalidIndex { index: 9, len: 5 }).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(QueueError::MalformedQueue("cycle".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("user".into());
        assert_eq!(err.to_string(), "Not found: user");

        let err = AppError::from(QueueError::StaleAnswer("q-1".into()));
        assert_eq!(err.to_string(), "question 'q-1' is not the current question");
    }
}
