//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authenticated author in the session
    #[error("Authentication required")]
    Unauthenticated,

    /// Session payload could not be encoded
    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Encoding(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Encoding(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side detail stays in the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Unauthenticated => AppError::unauthorized(self.to_string()),
            _ => AppError::internal("Internal server error"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Encoding(e) => {
                tracing::error!(error = %e, "Session encoding error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Unauthenticated => {
                tracing::debug!("Rejected request without an authenticated session");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
