//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    AuthUnitOfWork, SessionRepository, UserRepository, VerificationTokenRepository,
};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository
        + VerificationTokenRepository
        + SessionRepository
        + AuthUnitOfWork
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/otp/verify", post(handlers::verify_otp::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/session", get(handlers::session_status::<R>))
        .layer(axum::middleware::from_fn(middleware::install_session_cache))
        .with_state(state)
}
