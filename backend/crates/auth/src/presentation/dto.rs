//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::current_session::CurrentSession;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// OTP Verification
// ============================================================================

/// OTP verification request (email comes from the temp cookie)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub otp: String,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Sanitized user payload (no password hash anywhere near this type)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
}

impl From<&CurrentSession> for SessionUserResponse {
    fn from(current: &CurrentSession) -> Self {
        Self {
            user_id: current.user.user_id.to_string(),
            email: current.user.email.as_str().to_string(),
            full_name: current.user.full_name.as_str().to_string(),
            role: current.user.role.code().to_string(),
            permissions: current.user.permissions.codes(),
            email_verified_at: current.user.email_verified_at,
        }
    }
}

// ============================================================================
// Action Failures
// ============================================================================

/// One field-level validation message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_name: String,
    pub message: String,
}

/// Failure payload variants consumed by the form layer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "error", rename_all = "camelCase")]
pub enum FailureDetail {
    /// Field-level messages rendered next to inputs
    Input(Vec<FieldError>),
    /// Free-form message rendered as a toast
    Custom(String),
}

/// The `{failed, type, error}` body for expected business failures
#[derive(Debug, Clone, Serialize)]
pub struct ActionFailure {
    pub failed: bool,
    #[serde(flatten)]
    pub detail: FailureDetail,
}

impl ActionFailure {
    pub fn input(errors: Vec<FieldError>) -> Self {
        Self {
            failed: true,
            detail: FailureDetail::Input(errors),
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::input(vec![FieldError {
            field_name: field.into(),
            message: message.into(),
        }])
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            failed: true,
            detail: FailureDetail::Custom(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_failure_shape() {
        let failure = ActionFailure::field("email", "Invalid email format");
        let json = serde_json::to_value(&failure).unwrap();

        assert_eq!(json["failed"], true);
        assert_eq!(json["type"], "input");
        assert_eq!(json["error"][0]["fieldName"], "email");
        assert_eq!(json["error"][0]["message"], "Invalid email format");
    }

    #[test]
    fn test_custom_failure_shape() {
        let failure = ActionFailure::custom("Email or password is wrong");
        let json = serde_json::to_value(&failure).unwrap();

        assert_eq!(json["failed"], true);
        assert_eq!(json["type"], "custom");
        assert_eq!(json["error"], "Email or password is wrong");
    }

    #[test]
    fn test_requests_accept_camel_case() {
        let req: SignUpRequest = serde_json::from_str(
            r#"{"fullName":"Ada Lovelace","email":"ada@example.com","password":"difference engine"}"#,
        )
        .unwrap();
        assert_eq!(req.full_name, "Ada Lovelace");

        let req: VerifyOtpRequest = serde_json::from_str(r#"{"otp":"123456"}"#).unwrap();
        assert_eq!(req.otp, "123456");
    }
}
