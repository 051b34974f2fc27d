//! Full Name Value Object
//!
//! Display name captured at signup. Unlike a login handle there is no
//! canonical form and no uniqueness requirement, so validation stays
//! minimal: NFKC normalization, trimming, length bounds, and a ban on
//! control characters.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a full name (in characters)
pub const FULL_NAME_MAX_LENGTH: usize = 100;

/// Full name validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FullNameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name must be at most {FULL_NAME_MAX_LENGTH} characters")]
    TooLong,

    #[error("Name contains invalid characters")]
    InvalidCharacter,
}

/// User's full (display) name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName(String);

impl FullName {
    /// Create a new full name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, FullNameError> {
        let normalized: String = name.into().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(FullNameError::Empty);
        }

        if trimmed.chars().count() > FULL_NAME_MAX_LENGTH {
            return Err(FullNameError::TooLong);
        }

        if trimmed.chars().any(|c| c.is_control()) {
            return Err(FullNameError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
