//! Verification Token Entity
//!
//! Short-lived (identifier, code, expiry) row backing OTP email
//! verification. The composite key is (identifier, code); consumption is
//! a single atomic delete-returning.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{email::Email, otp_code::OtpCode};

/// Verification token entity
#[derive(Debug, Clone)]
pub struct VerificationToken {
    /// The email being verified
    pub identifier: Email,
    /// Six-digit one-time code
    pub code: OtpCode,
    /// Hard expiry cutoff
    pub expires_at: DateTime<Utc>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Issue a fresh token with a random code
    pub fn new(identifier: Email, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            identifier,
            code: OtpCode::generate(),
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Check if the code is past its expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
