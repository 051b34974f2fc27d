//! Session Token Value Object
//!
//! Opaque unique token naming a server-side session row. The token is a
//! random UUIDv4 in string form; clients hold it only inside the signed
//! session cookie and the server treats it purely as a lookup key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque session token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh random token
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token value from storage or a decoded cookie
    ///
    /// No validation: an unknown token simply matches no session row.
    pub fn from_value(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines (never log the full token)
    pub fn preview(&self) -> &str {
        let end = self.0.len().min(8);
        &self.0[..end]
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unique() {
        let a = SessionToken::new();
        let b = SessionToken::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_value_roundtrip() {
        let token = SessionToken::new();
        let restored = SessionToken::from_value(token.as_str());
        assert_eq!(token, restored);
    }

    #[test]
    fn test_preview_is_short() {
        let token = SessionToken::new();
        assert_eq!(token.preview().len(), 8);
        assert!(token.as_str().starts_with(token.preview()));

        let short = SessionToken::from_value("abc");
        assert_eq!(short.preview(), "abc");
    }
}
