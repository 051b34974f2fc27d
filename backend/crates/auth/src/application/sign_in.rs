//! Sign In Use Case
//!
//! Authenticates credentials and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository, VerificationTokenRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: crate::domain::entity::user::User,
    pub session: Session,
}

/// Sign in use case
pub struct SignInUseCase<U, T, S>
where
    U: UserRepository,
    T: VerificationTokenRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, T, S> SignInUseCase<U, T, S>
where
    U: UserRepository,
    T: VerificationTokenRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // A malformed email or policy-violating password can never match a
        // stored hash, so both collapse into the same credentials failure
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // An unverified account cannot log in; drop its pending code so the
        // instructed re-signup starts clean
        if !user.is_verified() {
            self.token_repo.delete_for_identifier(&email).await?;
            return Err(AuthError::AccountNotVerified);
        }

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::new(user.user_id, self.config.session_ttl_chrono());
        self.session_repo.create(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session = %session.session_token.preview(),
            "User signed in"
        );

        Ok(SignInOutput { user, session })
    }
}
