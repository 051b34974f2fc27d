//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentSessionUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
    VerifyOtpInput, VerifyOtpUseCase,
};
use crate::domain::repository::{
    AuthUnitOfWork, SessionRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::session_token::SessionToken;
use crate::error::AuthResult;
use crate::presentation::cookies;
use crate::presentation::dto::{
    ActionFailure, LoginRequest, SessionStatusResponse, SessionUserResponse, SignUpRequest,
    VerifyOtpRequest,
};
use crate::presentation::middleware::SessionCache;

/// Shared state for auth handlers
pub struct AuthAppState<R>
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
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R>
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
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
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
    let use_case = SignUpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        full_name: req.full_name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    let temp_cookie =
        cookies::temp_cookie_header(&state.config, &output.user.user_id, &output.token)?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, temp_cookie)],
    ))
}

// ============================================================================
// OTP Verification
// ============================================================================

/// POST /api/auth/otp/verify
///
/// The pending email comes from the temp cookie, never from the form.
pub async fn verify_otp<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<VerifyOtpRequest>,
) -> AuthResult<Response>
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
    let Some(claims) = cookies::read_temp_claims(&state.config, &headers) else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(ActionFailure::custom(
                "Your signup session has expired. Please sign up again.",
            )),
        )
            .into_response());
    };

    let use_case = VerifyOtpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(VerifyOtpInput {
            email: claims.identifier,
            otp: req.otp,
        })
        .await?;

    let session_cookie = cookies::session_cookie_header(
        &state.config,
        &output.session,
        output.user.role,
        &output.user.permissions,
    )?;

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, cookies::clear_temp_cookie_header(&state.config)),
        ]),
    )
        .into_response())
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
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
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let session_cookie = cookies::session_cookie_header(
        &state.config,
        &output.session,
        output.user.role,
        &output.user.permissions,
    )?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session_cookie)],
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
///
/// Idempotent: both cookies are cleared whether or not a session row
/// still existed.
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
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
    if let Some(claims) = cookies::read_session_claims(&state.config, &headers) {
        let use_case = SignOutUseCase::new(state.repo.clone());
        use_case
            .execute(&SessionToken::from_value(claims.session_token))
            .await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (header::SET_COOKIE, cookies::clear_session_cookie_header(&state.config)),
            (header::SET_COOKIE, cookies::clear_temp_cookie_header(&state.config)),
        ]),
    ))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
///
/// The optimistic read used by both frontends' user-data providers. An
/// authenticated session makes any leftover signup cookie moot, so it is
/// cleared on the way out.
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    Extension(cache): Extension<SessionCache>,
    headers: HeaderMap,
) -> AuthResult<Response>
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
    let claims = cookies::read_session_claims(&state.config, &headers);
    let had_session_cookie = claims.is_some();

    let token = claims.map(|c| SessionToken::from_value(c.session_token));
    let use_case = CurrentSessionUseCase::new(state.repo.clone(), state.repo.clone());
    let current = cache.resolve(&use_case, token.as_ref()).await?;

    let body = match &current {
        Some(current) => SessionStatusResponse {
            authenticated: true,
            user: Some(SessionUserResponse::from(current)),
            expires_at: Some(current.session.expires_at),
        },
        None => SessionStatusResponse {
            authenticated: false,
            user: None,
            expires_at: None,
        },
    };

    let mut response = Json(body).into_response();

    let leftover_temp_cookie = state.config.temp_cookie().read(&headers).is_some();
    if had_session_cookie && leftover_temp_cookie {
        if let Ok(value) = HeaderValue::from_str(&cookies::clear_temp_cookie_header(&state.config))
        {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    Ok(response)
}
