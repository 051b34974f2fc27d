//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{session::Session, user::User, verification_token::VerificationToken};
use crate::domain::value_object::{
    email::Email, otp_code::OtpCode, session_token::SessionToken, user_id::UserId,
    user_password::UserPassword,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Overwrite the password hash for an existing user
    ///
    /// Errors if no row matched: callers only invoke this for a user they
    /// just fetched.
    async fn update_password(
        &self,
        email: &Email,
        password_hash: &UserPassword,
    ) -> AuthResult<User>;
}

/// Verification token repository trait
#[trait_variant::make(VerificationTokenRepository: Send)]
pub trait LocalVerificationTokenRepository {
    /// Persist a freshly issued token
    async fn create(&self, token: &VerificationToken) -> AuthResult<()>;

    /// Purge every token for an identifier (returns rows deleted)
    async fn delete_for_identifier(&self, identifier: &Email) -> AuthResult<u64>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find a live (unexpired) session by token
    async fn find_live_by_token(&self, token: &SessionToken) -> AuthResult<Option<Session>>;

    /// Delete a session by token (returns rows deleted; 0 is not an error)
    async fn delete_by_token(&self, token: &SessionToken) -> AuthResult<u64>;
}

/// Transactional boundary for OTP redemption
///
/// Consuming the token and stamping the user verified happen atomically:
/// a crash can never leave a consumed token next to an unverified user,
/// or a verified user next to a live token.
#[trait_variant::make(AuthUnitOfWork: Send)]
pub trait LocalAuthUnitOfWork {
    /// Atomically delete the matching (identifier, code) token and, if it
    /// existed and had not expired at `now`, mark the user verified.
    ///
    /// Returns the verified user, or `None` when no token matched or the
    /// matched token was expired (it is consumed either way).
    async fn redeem_verification(
        &self,
        identifier: &Email,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>>;
}
