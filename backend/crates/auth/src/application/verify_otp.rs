//! Verify OTP Use Case
//!
//! Consumes a one-time code and promotes the account to verified, then
//! opens the first session.
//!
//! Token consumption and the verified stamp run in one transaction
//! (`AuthUnitOfWork`); the session insert happens after the commit. If the
//! process dies in between, the user is verified with no session, which
//! normal login recovers from.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{AuthUnitOfWork, SessionRepository};
use crate::domain::value_object::{email::Email, otp_code::OtpCode};
use crate::error::{AuthError, AuthResult};

/// Verify OTP input
///
/// `email` comes from the decoded temp cookie, `otp` from the form.
pub struct VerifyOtpInput {
    pub email: String,
    pub otp: String,
}

/// Verify OTP output
#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub user: User,
    pub session: Session,
}

/// Verify OTP use case
pub struct VerifyOtpUseCase<W, S>
where
    W: AuthUnitOfWork,
    S: SessionRepository,
{
    uow: Arc<W>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<W, S> VerifyOtpUseCase<W, S>
where
    W: AuthUnitOfWork,
    S: SessionRepository,
{
    pub fn new(uow: Arc<W>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            uow,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: VerifyOtpInput) -> AuthResult<VerifyOtpOutput> {
        // Wrong code, expired code, malformed code: one indistinguishable
        // failure, so nothing leaks about what exists
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidOtp)?;
        let code = OtpCode::parse(input.otp).map_err(|_| AuthError::InvalidOtp)?;

        let user = self
            .uow
            .redeem_verification(&email, &code, Utc::now())
            .await?
            .ok_or(AuthError::InvalidOtp)?;

        let session = Session::new(user.user_id, self.config.session_ttl_chrono());
        self.session_repo.create(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session = %session.session_token.preview(),
            "Email verified, session created"
        );

        Ok(VerifyOtpOutput { user, session })
    }
}
