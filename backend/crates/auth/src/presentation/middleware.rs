//! Auth Middleware
//!
//! The request-scoped session memo and the middleware that requires a
//! live session on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::application::config::AuthConfig;
use crate::application::current_session::{CurrentSession, CurrentSessionUseCase};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::session_token::SessionToken;
use crate::error::AuthResult;
use crate::presentation::cookies;

// ============================================================================
// Request-scoped session memo
// ============================================================================

/// Per-request memo for the current-session lookup
///
/// Installed into request extensions by [`install_session_cache`], so the
/// store is hit at most once per request no matter how many
/// handlers/middleware ask. Never shared across requests.
#[derive(Clone, Default)]
pub struct SessionCache {
    cell: Arc<OnceCell<Option<CurrentSession>>>,
}

impl SessionCache {
    /// Resolve (or recall) the current session for this request
    pub async fn resolve<S, U>(
        &self,
        use_case: &CurrentSessionUseCase<S, U>,
        token: Option<&SessionToken>,
    ) -> AuthResult<Option<CurrentSession>>
    where
        S: SessionRepository,
        U: UserRepository,
    {
        let current = self
            .cell
            .get_or_try_init(|| async {
                match token {
                    Some(token) => use_case.execute(token).await,
                    None => Ok(None),
                }
            })
            .await?;

        Ok(current.clone())
    }
}

/// Middleware installing a fresh [`SessionCache`] per request
pub async fn install_session_cache(mut req: Request<Body>, next: Next) -> Response {
    req.extensions_mut().insert(SessionCache::default());
    next.run(req).await
}

// ============================================================================
// require_session
// ============================================================================

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware that requires a live, verified session
///
/// Mount with `axum::middleware::from_fn_with_state`. On success the
/// resolved [`CurrentSession`] is inserted into request extensions for
/// downstream handlers (e.g. permission checks).
pub async fn require_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: SessionRepository + UserRepository + Clone + Send + Sync + 'static,
{
    let cache = req
        .extensions()
        .get::<SessionCache>()
        .cloned()
        .unwrap_or_default();

    let token = cookies::read_session_claims(&state.config, req.headers())
        .map(|claims| SessionToken::from_value(claims.session_token));

    let use_case = CurrentSessionUseCase::new(state.repo.clone(), state.repo.clone());

    let current = cache
        .resolve(&use_case, token.as_ref())
        .await
        .map_err(|e| e.into_response())?;

    match current {
        Some(current) => {
            req.extensions_mut().insert(current);
            Ok(next.run(req).await)
        }
        None => Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response()),
    }
}
