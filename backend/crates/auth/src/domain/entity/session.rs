//! Session Entity
//!
//! Server-side session row referenced by the signed session cookie.
//! Expiry is a hard cutoff with no sliding renewal, and a user may hold
//! any number of concurrent sessions.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque unique token (cookie lookup key)
    pub session_token: SessionToken,
    /// Reference to User
    pub user_id: UserId,
    /// Hard expiry cutoff
    pub expires_at: DateTime<Utc>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with a fresh token
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_token: SessionToken::new(),
            user_id,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
