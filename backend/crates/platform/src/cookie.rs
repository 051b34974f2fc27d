//! Cookie Management Infrastructure
//!
//! Common cookie handling utilities and configuration.
//!
//! The `secure` flag drives a deliberate environment-conditioned policy:
//! in trusted (production) environments cookies are `HttpOnly; Secure` and
//! carry the `__Secure-` name prefix; in development all three are relaxed
//! so plain-HTTP localhost testing works. Set/get/delete all use the same
//! effective name, so a cookie written in one environment is invisible to
//! the other.

use axum::http::{HeaderMap, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Effective cookie name on the wire
    ///
    /// Secure cookies carry the `__Secure-` prefix so user agents enforce
    /// the Secure attribute on overwrites.
    pub fn effective_name(&self) -> String {
        if self.secure {
            format!("__Secure-{}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.effective_name(), value);

        if self.secure {
            cookie.push_str("; HttpOnly; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.effective_name(),
            self.path
        );

        if self.secure {
            cookie.push_str("; HttpOnly; Secure");
        }

        cookie
    }

    /// Read this cookie's raw value from request headers
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.effective_name())
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}
