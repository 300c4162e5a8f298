use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use vitals_common::models::ValidationError;
use vitals_db::StoreError;

/// Errors surfaced by request handling.
///
/// `Validation` and `Authentication` are normally caught by handlers and shown
/// as a flash message on the originating form; the rest become error pages.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid credentials")]
    Authentication,
    #[error("Forbidden")]
    Forbidden,
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::Validation("Email already exists".to_string()),
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = format!(
            "<!doctype html><title>{code}</title><h1>{code}</h1><p>{message}</p>",
            code = status.as_u16(),
            message = message
        );
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_email_becomes_validation() {
        let err: AppError = StoreError::DuplicateEmail.into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email already exists"));
    }

    #[test]
    fn test_validation_error_message_carries_over() {
        let err: AppError = ValidationError::NotANumber { field: "sugar" }.into();
        assert_eq!(err.to_string(), "sugar must be a number");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("db password is hunter2")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_authentication_message_is_generic() {
        assert_eq!(AppError::Authentication.to_string(), "Invalid credentials");
    }
}
