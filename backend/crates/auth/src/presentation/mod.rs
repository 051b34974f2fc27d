//! Presentation Layer
//!
//! HTTP handlers, DTOs, cookie helpers, router, and middleware.

pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, SessionCache, install_session_cache, require_session};
pub use router::{auth_router, auth_router_generic};
