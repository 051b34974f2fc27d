//! Sign Up Use Case
//!
//! Creates (or re-creates) an unverified account and issues a one-time
//! verification code.
//!
//! Re-entry policy: an *unverified* account may sign up again with the
//! same email; the password is overwritten and a fresh code is issued.
//! Only a verified account blocks the email.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{user::User, verification_token::VerificationToken};
use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::domain::value_object::{
    email::Email,
    full_name::FullName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Sign up output
///
/// The handler builds the temp cookie from these.
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    pub token: VerificationToken,
}

/// Sign up use case
pub struct SignUpUseCase<U, T>
where
    U: UserRepository,
    T: VerificationTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    config: Arc<AuthConfig>,
}

impl<U, T> SignUpUseCase<U, T>
where
    U: UserRepository,
    T: VerificationTokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            token_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // Validate input into value objects (field-level failures)
        let email = Email::new(input.email)
            .map_err(|e| AuthError::validation("email", e.to_string()))?;
        let full_name = FullName::new(input.full_name)
            .map_err(|e| AuthError::validation("fullName", e.to_string()))?;
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::validation("password", e.to_string()))?;

        // Advisory breach check; an unreachable API never blocks signup
        if self.config.check_password_breach {
            match raw_password.is_compromised().await {
                Ok(true) => {
                    return Err(AuthError::validation(
                        "password",
                        "This password has appeared in a data breach",
                    ));
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Breach check unavailable, continuing");
                }
            }
        }

        // A verified account owns its email; an unverified one may retry
        let existing = self.user_repo.find_by_email(&email).await?;
        if existing.as_ref().is_some_and(User::is_verified) {
            return Err(AuthError::DuplicateEmail);
        }

        // One live token per email: purge before reissuing
        self.token_repo.delete_for_identifier(&email).await?;

        let token = VerificationToken::new(email.clone(), self.config.otp_ttl_chrono());
        self.token_repo.create(&token).await?;

        if self.config.expose_otp_in_logs {
            tracing::info!(email = %email, code = %token.code, "Verification code issued");
        } else {
            // Delivery (email/SMS) happens out of band
            tracing::info!(email = %email, "Verification code issued");
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = match existing {
            Some(_) => {
                self.user_repo
                    .update_password(&email, &password_hash)
                    .await?
            }
            None => {
                let user = User::new(email, full_name, password_hash);
                self.user_repo.create(&user).await?;
                user
            }
        };

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(SignUpOutput { user, token })
    }
}
