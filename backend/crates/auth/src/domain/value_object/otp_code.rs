//! OTP Code Value Object
//!
//! Six-digit numeric one-time code proving email ownership.
//! The code space (100000..=999999) is small on purpose: codes live for
//! five minutes and are consumed on first use.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of digits in a one-time code
pub const OTP_CODE_LENGTH: usize = 6;

/// OTP parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpCodeError {
    #[error("Code must be exactly {OTP_CODE_LENGTH} digits")]
    InvalidFormat,
}

/// One-time verification code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a fresh random code
    ///
    /// The range keeps a leading non-zero digit so the code is always
    /// six characters without padding.
    pub fn generate() -> Self {
        let code: u32 = rand::rng().random_range(100_000..1_000_000);
        Self(code.to_string())
    }

    /// Parse a user-submitted code
    pub fn parse(code: impl Into<String>) -> Result<Self, OtpCodeError> {
        let code = code.into();

        if code.len() != OTP_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(OtpCodeError::InvalidFormat);
        }

        Ok(Self(code))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        for _ in 0..50 {
            let code = OtpCode::generate();
            assert_eq!(code.as_str().len(), OTP_CODE_LENGTH);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_str().chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(OtpCode::parse("123456").unwrap().as_str(), "123456");
        assert_eq!(OtpCode::parse("000000").unwrap().as_str(), "000000");
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(OtpCode::parse("12345"), Err(OtpCodeError::InvalidFormat));
        assert_eq!(OtpCode::parse("1234567"), Err(OtpCodeError::InvalidFormat));
        assert_eq!(OtpCode::parse("12a456"), Err(OtpCodeError::InvalidFormat));
        assert_eq!(OtpCode::parse(""), Err(OtpCodeError::InvalidFormat));
        assert_eq!(OtpCode::parse("１２３４５６"), Err(OtpCodeError::InvalidFormat));
    }
}
