//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Signup with email + full name + password
//! - OTP email verification (6-digit code, 5-minute expiry)
//! - Login against the stored Argon2id hash
//! - Server-side sessions referenced by signed cookies (180-day cutoff)
//! - Typed (method, resource) permission checks for elevated roles
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Cookies are signed transport only; every authorization decision
//!   re-validates against the session and user rows
//! - Unknown-email and wrong-password logins are indistinguishable
//! - Wrong and expired OTP codes are indistinguishable

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::session::*;
    pub use crate::domain::entity::user::*;
    pub use crate::domain::entity::verification_token::*;
    pub use crate::domain::value_object::permission::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
