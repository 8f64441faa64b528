use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Request-terminal error taxonomy. Every variant maps to one HTTP status;
/// no retries happen anywhere behind these.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credentials. HTTP 401. The message is
    /// uniform on purpose; it never says which check failed.
    #[error("{0}")]
    Unauthorized(String),

    /// Duplicate unique key on signup. Surfaced as HTTP 403, not 409, so a
    /// probe cannot confirm whether an email is registered.
    #[error("{0}")]
    Conflict(String),

    /// Authenticated but not the owner of the resource. HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Anything else. HTTP 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::FORBIDDEN,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

/// Unique-constraint violation from Postgres, the signal behind every
/// "credentials already taken" response.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, axum::Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_is_forbidden_not_409() {
        assert_eq!(
            ApiError::Conflict("Credentials already taken!".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
