//! Current Session Use Case
//!
//! The read path behind every protected request. The decoded cookie is a
//! lookup key only: the session row and the user's verified flag are
//! re-checked against the store on every resolution, and the password
//! hash never crosses this boundary.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    full_name::FullName,
    permission::{AccessMethod, PermissionSet, Resource, is_access_granted},
    session_token::SessionToken,
    user_id::UserId,
    user_role::UserRole,
};
use crate::error::AuthResult;

/// User view with the password hash stripped
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: Email,
    pub full_name: FullName,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub role: UserRole,
    pub permissions: PermissionSet,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            full_name: user.full_name,
            email_verified_at: user.email_verified_at,
            role: user.role,
            permissions: user.permissions,
        }
    }
}

/// A validated session plus its (sanitized) user
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: Session,
    pub user: SessionUser,
}

impl CurrentSession {
    /// Flat allow-list access check for this session's identity
    pub fn can_access(&self, method: AccessMethod, resource: Resource) -> bool {
        is_access_granted(self.user.role, &self.user.permissions, method, resource)
    }
}

/// Current session use case
pub struct CurrentSessionUseCase<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    session_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<S, U> CurrentSessionUseCase<S, U>
where
    S: SessionRepository,
    U: UserRepository,
{
    pub fn new(session_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            session_repo,
            user_repo,
        }
    }

    /// Resolve the current session from a decoded cookie token
    ///
    /// Returns `None` (never an error) for every trust failure: stale
    /// cookie, expired or deleted session row, missing user, unverified
    /// user.
    pub async fn execute(&self, token: &SessionToken) -> AuthResult<Option<CurrentSession>> {
        let Some(session) = self.session_repo.find_live_by_token(token).await? else {
            return Ok(None);
        };

        let Some(user) = self.user_repo.find_by_id(&session.user_id).await? else {
            // Session row outliving its user should not happen, but the
            // read path fails closed rather than loudly
            tracing::warn!(
                session = %token.preview(),
                "Live session references a missing user"
            );
            return Ok(None);
        };

        if !user.is_verified() {
            return Ok(None);
        }

        Ok(Some(CurrentSession {
            session,
            user: user.into(),
        }))
    }
}
