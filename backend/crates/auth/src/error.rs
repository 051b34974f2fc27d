//! Auth Error Types
//!
//! Two propagation styles coexist, mirroring how the consuming form layer
//! works:
//! - Expected business failures (the first five variants) render as the
//!   typed `{failed, type, error}` action-failure body so callers can show
//!   field-level or toast-level messages.
//! - Everything else is fatal and bubbles to the generic
//!   `kernel::AppError` boundary as a 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use thiserror::Error;

use crate::presentation::dto::ActionFailure;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// A verified account already owns this email
    #[error("This email already exists.")]
    DuplicateEmail,

    /// Wrong code, expired code, or no pending verification.
    /// Deliberately one variant: callers must request a fresh code either way.
    #[error("Invalid OTP")]
    InvalidOtp,

    /// Unknown email or wrong password.
    /// One message for both, so accounts cannot be enumerated.
    #[error("Email or password is wrong")]
    InvalidCredentials,

    /// Login attempt against an account that never finished OTP verification
    #[error(
        "Your account is not verified yet. Go to the signup page and create your account again."
    )]
    AccountNotVerified,

    /// Field-level input validation failure
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Shorthand for a field-level validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::InvalidOtp => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountNotVerified => StatusCode::FORBIDDEN,
            AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The action-failure body for expected business failures
    ///
    /// `None` for fatal errors, which render through `AppError` instead.
    pub fn action_failure(&self) -> Option<ActionFailure> {
        match self {
            AuthError::DuplicateEmail => {
                Some(ActionFailure::field("email", self.to_string()))
            }
            AuthError::Validation { field, message } => {
                Some(ActionFailure::field(*field, message.clone()))
            }
            AuthError::InvalidOtp
            | AuthError::InvalidCredentials
            | AuthError::AccountNotVerified => Some(ActionFailure::custom(self.to_string())),
            AuthError::Database(_) | AuthError::Internal(_) => None,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        match self.action_failure() {
            Some(failure) => (self.status_code(), Json(failure)).into_response(),
            None => AppError::internal(self.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidOtp.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountNotVerified.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::validation("email", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_business_failures_have_action_bodies() {
        assert!(AuthError::DuplicateEmail.action_failure().is_some());
        assert!(AuthError::InvalidOtp.action_failure().is_some());
        assert!(AuthError::InvalidCredentials.action_failure().is_some());
        assert!(AuthError::AccountNotVerified.action_failure().is_some());
        assert!(AuthError::validation("otp", "bad").action_failure().is_some());
        assert!(AuthError::Internal("x".into()).action_failure().is_none());
    }

    #[test]
    fn test_duplicate_email_is_a_field_error() {
        let body =
            serde_json::to_value(AuthError::DuplicateEmail.action_failure().unwrap()).unwrap();
        assert_eq!(body["failed"], true);
        assert_eq!(body["type"], "input");
        assert_eq!(body["error"][0]["fieldName"], "email");
    }

    #[test]
    fn test_credential_errors_are_indistinguishable() {
        // Unknown email and wrong password share one variant; the message
        // can never leak which one happened.
        let a = AuthError::InvalidCredentials.to_string();
        let b = AuthError::InvalidCredentials.to_string();
        assert_eq!(a, b);
        assert_eq!(a, "Email or password is wrong");
    }
}
