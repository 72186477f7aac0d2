use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    fn status(&self) -> StatusCode {
        match self {
            ChatError::Unauthorized => StatusCode::UNAUTHORIZED,
            ChatError::Forbidden(_) => StatusCode::FORBIDDEN,
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Conflict(_) => StatusCode::CONFLICT,
            ChatError::Database(_) | ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text suitable for a relay error frame; internal detail stays in the
    /// logs just like the HTTP path.
    pub fn relay_text(&self) -> String {
        match self {
            ChatError::Database(_) | ChatError::Internal(_) => {
                tracing::error!("{self}");
                "Failed to send message".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ChatError {
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

impl From<sqlx::Error> for ChatError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return ChatError::Conflict("Duplicate entry".to_string());
            }
        }
        ChatError::Database(err.to_string())
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ChatError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ChatError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ChatError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_relay_text_hides_internal_detail() {
        let text = ChatError::Database("connection refused".into()).relay_text();
        assert_eq!(text, "Failed to send message");

        let text = ChatError::Forbidden("You can only message your connections".into()).relay_text();
        assert_eq!(text, "You can only message your connections");
    }
}
