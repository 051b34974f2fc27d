//! Sign Out Use Case
//!
//! Deletes the server-side session row. Idempotent: a stale or already
//! deleted token is not an error, the cookies get cleared regardless.

use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self, token: &SessionToken) -> AuthResult<()> {
        let deleted = self.session_repo.delete_by_token(token).await?;

        tracing::info!(
            session = %token.preview(),
            deleted = deleted,
            "User signed out"
        );

        Ok(())
    }
}
