//! Hokku Error Types
//!
//! This module provides hokku-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use std::fmt;

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

use crate::domain::repository::StoreError;
use crate::domain::validation::ValidationErrors;

/// Hokku-specific result type alias
pub type HokkuResult<T> = Result<T, HokkuError>;

/// Resource named in not-found messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Author,
    Theme,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Post => "hokku",
            Resource::Author => "user",
            Resource::Theme => "theme",
        };
        write!(f, "{}", name)
    }
}

/// Hokku-specific error variants
#[derive(Debug, Error)]
pub enum HokkuError {
    /// Malformed path or query parameter
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Request body is not the expected JSON
    #[error("Bad request params")]
    Decode(#[source] serde_json::Error),

    /// Field constraints violated
    #[error("Request did not pass validation")]
    Validation(ValidationErrors),

    /// Login secret did not match
    #[error("Wrong email or password")]
    WrongCredentials,

    #[error("A {0} with the specified ID was not found")]
    NotFound(Resource),

    #[error("A user with the specified email was not found")]
    EmailNotFound,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Theme with this title already exists")]
    DuplicateTitle,

    /// Missing owner/theme, or deleting a row that is still referenced
    #[error("Foreign key constraint fails")]
    ForeignKeyViolation,

    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordHashError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HokkuError {
    /// Classify a store outcome for the given resource
    pub fn from_store(err: StoreError, resource: Resource) -> Self {
        match (err, resource) {
            (StoreError::NotFound, resource) => HokkuError::NotFound(resource),
            (StoreError::ForeignKeyViolation, _) => HokkuError::ForeignKeyViolation,
            (StoreError::AlreadyExists, Resource::Author) => HokkuError::DuplicateEmail,
            (StoreError::AlreadyExists, Resource::Theme) => HokkuError::DuplicateTitle,
            (err, _) => HokkuError::Store(err),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HokkuError::Auth(e) => e.status_code(),
            _ => StatusCode::from_u16(self.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            HokkuError::InvalidInput(_)
            | HokkuError::Decode(_)
            | HokkuError::Validation(_)
            | HokkuError::WrongCredentials => ErrorKind::BadRequest,
            HokkuError::NotFound(_) | HokkuError::EmailNotFound => ErrorKind::NotFound,
            HokkuError::DuplicateEmail
            | HokkuError::DuplicateTitle
            | HokkuError::ForeignKeyViolation => ErrorKind::Conflict,
            HokkuError::Auth(e) => e.kind(),
            HokkuError::Password(_) | HokkuError::Store(_) | HokkuError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Backend detail never reaches the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            HokkuError::Validation(errors) => AppError::new(self.kind(), self.to_string())
                .with_violations(errors.violations().to_vec()),
            HokkuError::Auth(e) => e.to_app_error(),
            _ if self.kind().is_server_error() => AppError::new(self.kind(), "Unexpected error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            HokkuError::Store(e) => {
                tracing::error!(error = %e, "Hokku store error");
            }
            HokkuError::Password(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            HokkuError::Internal(msg) => {
                tracing::error!(message = %msg, "Hokku internal error");
            }
            HokkuError::WrongCredentials => {
                tracing::warn!("Login attempt with wrong password");
            }
            _ => {
                tracing::debug!(error = %self, "Hokku error");
            }
        }
    }
}

impl From<ValidationErrors> for HokkuError {
    fn from(errors: ValidationErrors) -> Self {
        HokkuError::Validation(errors)
    }
}

impl From<HokkuError> for AppError {
    fn from(err: HokkuError) -> Self {
        match err {
            HokkuError::Decode(e) => AppError::from(e),
            err => err.to_app_error(),
        }
    }
}

impl IntoResponse for HokkuError {
    fn into_response(self) -> Response {
        if let HokkuError::Auth(e) = self {
            return e.into_response();
        }
        self.log();
        AppError::from(self).into_response()
    }
}
