use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("OAuth provider error: {0}")]
    OAuth(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    fn status(&self) -> StatusCode {
        match self {
            IdentityError::InvalidCredentials | IdentityError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::UserNotFound => StatusCode::NOT_FOUND,
            IdentityError::EmailAlreadyExists | IdentityError::Conflict(_) => StatusCode::CONFLICT,
            IdentityError::Validation(_) | IdentityError::OAuth(_) => StatusCode::BAD_REQUEST,
            IdentityError::Forbidden(_) => StatusCode::FORBIDDEN,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ResponseError for IdentityError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        // Internal detail stays in the logs, not the response body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return IdentityError::Conflict("Duplicate entry".to_string());
            }
        }
        IdentityError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for IdentityError {
    fn from(err: validator::ValidationErrors) -> Self {
        IdentityError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            IdentityError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            IdentityError::EmailAlreadyExists.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            IdentityError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IdentityError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
    }
}
