//! Cookie Claims and Header Helpers
//!
//! The two cookie kinds and their signed payloads. Claims are transport
//! only: the server re-validates everything against the store, so a
//! decoded claim never grants anything by itself.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{session::Session, verification_token::VerificationToken};
use crate::domain::value_object::{
    permission::PermissionSet, user_id::UserId, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Claims
// ============================================================================

/// Payload of the authenticated session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookieClaims {
    pub user_id: Uuid,
    pub session_token: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Unix millis; informational only, the session row is authoritative
    pub expires: i64,
}

/// Payload of the temporary pre-verification cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempCookieClaims {
    pub user_id: Uuid,
    pub identifier: String,
    pub expires: i64,
}

// ============================================================================
// Set / Clear
// ============================================================================

/// Build the Set-Cookie header for a fresh session
pub fn session_cookie_header(
    config: &AuthConfig,
    session: &Session,
    role: UserRole,
    permissions: &PermissionSet,
) -> AuthResult<String> {
    let claims = SessionCookieClaims {
        user_id: session.user_id.into_uuid(),
        session_token: session.session_token.as_str().to_string(),
        role,
        permissions: if permissions.is_empty() {
            None
        } else {
            Some(permissions.codes())
        },
        expires: session.expires_at.timestamp_millis(),
    };

    let token = config
        .codec()
        .encode(&claims)
        .map_err(|e| AuthError::Internal(format!("Failed to sign session cookie: {e}")))?;

    Ok(config.session_cookie().build_set_cookie(&token))
}

/// Build the Set-Cookie header bridging signup to OTP verification
pub fn temp_cookie_header(
    config: &AuthConfig,
    user_id: &UserId,
    token: &VerificationToken,
) -> AuthResult<String> {
    let claims = TempCookieClaims {
        user_id: *user_id.as_uuid(),
        identifier: token.identifier.as_str().to_string(),
        expires: token.expires_at.timestamp_millis(),
    };

    let value = config
        .codec()
        .encode(&claims)
        .map_err(|e| AuthError::Internal(format!("Failed to sign temp cookie: {e}")))?;

    Ok(config.temp_cookie().build_set_cookie(&value))
}

/// Set-Cookie header deleting the session cookie
pub fn clear_session_cookie_header(config: &AuthConfig) -> String {
    config.session_cookie().build_delete_cookie()
}

/// Set-Cookie header deleting the temp cookie
pub fn clear_temp_cookie_header(config: &AuthConfig) -> String {
    config.temp_cookie().build_delete_cookie()
}

// ============================================================================
// Read
// ============================================================================

/// Decode the session cookie; fails closed to `None`
pub fn read_session_claims(config: &AuthConfig, headers: &HeaderMap) -> Option<SessionCookieClaims> {
    let raw = config.session_cookie().read(headers)?;
    config.codec().decode(&raw)
}

/// Decode the temp cookie; fails closed to `None`
pub fn read_temp_claims(config: &AuthConfig, headers: &HeaderMap) -> Option<TempCookieClaims> {
    let raw = config.temp_cookie().read(headers)?;
    config.codec().decode(&raw)
}
