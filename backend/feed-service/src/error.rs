use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedError {
    fn status(&self) -> StatusCode {
        match self {
            FeedError::PostNotFound | FeedError::CommentNotFound => StatusCode::NOT_FOUND,
            FeedError::Validation(_) => StatusCode::BAD_REQUEST,
            FeedError::Forbidden(_) => StatusCode::FORBIDDEN,
            FeedError::Conflict(_) => StatusCode::CONFLICT,
            FeedError::Database(_) | FeedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for FeedError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

impl From<sqlx::Error> for FeedError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return FeedError::Conflict("Duplicate entry".to_string());
            }
        }
        FeedError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for FeedError {
    fn from(err: validator::ValidationErrors) -> Self {
        FeedError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(FeedError::PostNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            FeedError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FeedError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(FeedError::Conflict("x".into()).status(), StatusCode::CONFLICT);
    }
}
