//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::signed::SignedCookieCodec;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name (the `__Secure-` prefix is added by the
    /// cookie layer in secure environments)
    pub session_cookie_name: String,
    /// Temp pre-verification cookie name
    pub temp_cookie_name: String,
    /// Shared secret for cookie signing (32 bytes)
    pub auth_secret: [u8; 32],
    /// OTP validity window (5 minutes)
    pub otp_ttl: Duration,
    /// Session validity (180 days), hard cutoff
    pub session_ttl: Duration,
    /// Whether cookies are HttpOnly/Secure/prefixed (production)
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Consult the HIBP breach corpus at signup (k-anonymity; advisory,
    /// an unreachable API never blocks signup)
    pub check_password_breach: bool,
    /// Log issued OTP codes instead of delivering them (development only;
    /// delivery itself is out of scope)
    pub expose_otp_in_logs: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "next-auth-session".to_string(),
            temp_cookie_name: "next-temp-auth".to_string(),
            auth_secret: [0u8; 32],
            otp_ttl: Duration::from_secs(5 * 60),
            session_ttl: Duration::from_secs(180 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            check_password_breach: true,
            expose_otp_in_logs: false,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self {
            auth_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookies, OTP in logs,
    /// no outbound breach lookups)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            check_password_breach: false,
            expose_otp_in_logs: true,
            ..Self::with_random_secret()
        }
    }

    /// Codec for both cookie kinds
    pub fn codec(&self) -> SignedCookieCodec {
        SignedCookieCodec::new(self.auth_secret)
    }

    /// Transport config for the session cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }

    /// Transport config for the temp pre-verification cookie
    pub fn temp_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.temp_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.otp_ttl.as_secs() as i64),
        }
    }

    /// OTP TTL as a chrono duration
    pub fn otp_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.otp_ttl).unwrap_or_else(|_| chrono::Duration::minutes(5))
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or_else(|_| chrono::Duration::days(180))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();

        assert_eq!(config.session_cookie_name, "next-auth-session");
        assert_eq!(config.temp_cookie_name, "next-temp-auth");
        assert_eq!(config.otp_ttl, Duration::from_secs(300));
        assert_eq!(config.session_ttl, Duration::from_secs(180 * 24 * 3600));
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert!(config.check_password_breach);
        assert!(!config.expose_otp_in_logs);
    }

    #[test]
    fn test_with_random_secret() {
        let config1 = AuthConfig::with_random_secret();
        let config2 = AuthConfig::with_random_secret();

        assert_ne!(config1.auth_secret, config2.auth_secret);
        assert!(config1.auth_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();

        assert!(!config.cookie_secure);
        assert!(!config.check_password_breach);
        assert!(config.expose_otp_in_logs);
        assert!(config.auth_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_cookie_configs_inherit_policy() {
        let config = AuthConfig::default();

        let session = config.session_cookie();
        assert_eq!(session.name, "next-auth-session");
        assert!(session.secure);
        assert_eq!(session.max_age_secs, Some(180 * 24 * 3600));

        let temp = config.temp_cookie();
        assert_eq!(temp.name, "next-temp-auth");
        assert_eq!(temp.max_age_secs, Some(300));
    }
}
