//! Unit tests for the auth crate
//!
//! Use cases run against an in-memory repository; the router tests drive
//! the full HTTP surface (cookies included) through `tower::oneshot`.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentSessionUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpOutput,
    SignUpUseCase, VerifyOtpInput, VerifyOtpUseCase,
};
use crate::domain::entity::{session::Session, user::User, verification_token::VerificationToken};
use crate::domain::repository::{
    AuthUnitOfWork, SessionRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{
    email::Email, otp_code::OtpCode, session_token::SessionToken, user_id::UserId,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory repository
// ============================================================================

#[derive(Clone, Default)]
struct MemStore {
    users: Arc<Mutex<Vec<User>>>,
    tokens: Arc<Mutex<Vec<VerificationToken>>>,
    sessions: Arc<Mutex<Vec<Session>>>,
}

impl MemStore {
    fn tokens_for(&self, email: &str) -> Vec<VerificationToken> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.identifier.as_str() == email)
            .cloned()
            .collect()
    }

    fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    fn expire_tokens_for(&self, email: &str) {
        let past = Utc::now() - Duration::seconds(1);
        for token in self.tokens.lock().unwrap().iter_mut() {
            if token.identifier.as_str() == email {
                token.expires_at = past;
            }
        }
    }
}

impl UserRepository for MemStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn update_password(
        &self,
        email: &Email,
        password_hash: &UserPassword,
    ) -> AuthResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email == *email)
            .ok_or_else(|| AuthError::Internal("Password update returned no row".to_string()))?;
        user.set_password(password_hash.clone());
        Ok(user.clone())
    }
}

impl VerificationTokenRepository for MemStore {
    async fn create(&self, token: &VerificationToken) -> AuthResult<()> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn delete_for_identifier(&self, identifier: &Email) -> AuthResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.identifier != *identifier);
        Ok((before - tokens.len()) as u64)
    }
}

impl SessionRepository for MemStore {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_live_by_token(&self, token: &SessionToken) -> AuthResult<Option<Session>> {
        let now = Utc::now();
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.session_token == *token && s.expires_at > now)
            .cloned())
    }

    async fn delete_by_token(&self, token: &SessionToken) -> AuthResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.session_token != *token);
        Ok((before - sessions.len()) as u64)
    }
}

impl AuthUnitOfWork for MemStore {
    async fn redeem_verification(
        &self,
        identifier: &Email,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        let consumed = {
            let mut tokens = self.tokens.lock().unwrap();
            let position = tokens
                .iter()
                .position(|t| t.identifier == *identifier && t.code == *code);
            position.map(|i| tokens.remove(i))
        };

        let Some(token) = consumed else {
            return Ok(None);
        };

        if token.is_expired_at(now) {
            return Ok(None);
        }

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email == *identifier)
            .ok_or_else(|| {
                AuthError::Internal("Verification token matched a missing user".to_string())
            })?;
        user.mark_verified(now);
        Ok(Some(user.clone()))
    }
}

// ============================================================================
// Test harness
// ============================================================================

struct Harness {
    store: MemStore,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: MemStore::default(),
            config: Arc::new(AuthConfig::development()),
        }
    }

    fn repo(&self) -> Arc<MemStore> {
        Arc::new(self.store.clone())
    }

    async fn sign_up(&self, full_name: &str, email: &str, password: &str) -> AuthResult<SignUpOutput> {
        SignUpUseCase::new(self.repo(), self.repo(), self.config.clone())
            .execute(SignUpInput {
                full_name: full_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> AuthResult<crate::application::VerifyOtpOutput> {
        VerifyOtpUseCase::new(self.repo(), self.repo(), self.config.clone())
            .execute(VerifyOtpInput {
                email: email.to_string(),
                otp: otp.to_string(),
            })
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<crate::application::SignInOutput> {
        SignInUseCase::new(self.repo(), self.repo(), self.repo(), self.config.clone())
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn current_session(&self, token: &SessionToken) -> AuthResult<Option<crate::application::CurrentSession>> {
        CurrentSessionUseCase::new(self.repo(), self.repo())
            .execute(token)
            .await
    }
}

// ============================================================================
// Use case tests
// ============================================================================

#[cfg(test)]
mod use_case_tests {
    use super::*;

    const EMAIL: &str = "a@x.com";
    const PASSWORD: &str = "correct horse battery";

    #[tokio::test]
    async fn test_signup_leaves_exactly_one_token() {
        let h = Harness::new();

        h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        assert_eq!(h.store.tokens_for(EMAIL).len(), 1);

        // Repeated signup purges the old token first
        h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        assert_eq!(h.store.tokens_for(EMAIL).len(), 1);
    }

    #[tokio::test]
    async fn test_signup_token_shape() {
        let h = Harness::new();
        let output = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();

        let code = output.token.code.as_str();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let ttl = output.token.expires_at - output.token.created_at;
        assert_eq!(ttl, Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_signup_validation_field_errors() {
        let h = Harness::new();

        let err = h.sign_up("A", "not-an-email", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { field: "email", .. }));

        let err = h.sign_up("A", EMAIL, "short").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { field: "password", .. }));

        let err = h.sign_up("", EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { field: "fullName", .. }));
    }

    #[tokio::test]
    async fn test_happy_path_signup_verify() {
        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, "password1 extended").await.unwrap();
        assert!(!signup.user.is_verified());

        let output = h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();

        assert!(output.user.is_verified());
        assert_eq!(output.session.user_id, output.user.user_id);
        assert_eq!(h.store.session_count(), 1);
        assert!(h.store.tokens_for(EMAIL).is_empty());

        // The session resolves on the read path
        let current = h
            .current_session(&output.session.session_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.user.email.as_str(), EMAIL);

        // A plain user bypasses the permission allow-list entirely
        use crate::domain::value_object::permission::{AccessMethod, Resource};
        assert!(current.can_access(AccessMethod::Delete, Resource::Category));
    }

    #[tokio::test]
    async fn test_elevated_session_consults_permission_set() {
        use crate::domain::value_object::permission::{AccessMethod, PermissionSet, Resource};
        use crate::domain::value_object::user_role::UserRole;

        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        let verified = h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();

        // Promote the stored user to moderator with a single grant
        for user in h.store.users.lock().unwrap().iter_mut() {
            user.role = UserRole::Moderator;
            user.permissions = PermissionSet::from_codes(&["createCategory"]);
        }

        let current = h
            .current_session(&verified.session.session_token)
            .await
            .unwrap()
            .unwrap();

        assert!(current.can_access(AccessMethod::Create, Resource::Category));
        assert!(!current.can_access(AccessMethod::Delete, Resource::Category));
        assert!(!current.can_access(AccessMethod::Create, Resource::Product));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_code() {
        let h = Harness::new();
        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();

        // Any 6-digit code that is not the issued one
        let wrong = if signup.token.code.as_str() == "111111" {
            "222222"
        } else {
            "111111"
        };

        let err = h.verify_otp(EMAIL, wrong).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));

        // A wrong guess does not consume the real token
        assert_eq!(h.store.tokens_for(EMAIL).len(), 1);
        h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_code_and_consumes_it() {
        let h = Harness::new();
        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();

        h.store.expire_tokens_for(EMAIL);

        let err = h
            .verify_otp(EMAIL, signup.token.code.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));

        // Expired token is consumed; the same code can never succeed later
        assert!(h.store.tokens_for(EMAIL).is_empty());
        let err = h
            .verify_otp(EMAIL, signup.token.code.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_code() {
        let h = Harness::new();
        h.sign_up("A", EMAIL, PASSWORD).await.unwrap();

        let err = h.verify_otp(EMAIL, "12345").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));
    }

    #[tokio::test]
    async fn test_duplicate_email_only_after_verification() {
        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();

        let err = h.sign_up("A", EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_resignup_overwrites_password_and_reissues_code() {
        let h = Harness::new();

        let first = h.sign_up("A", EMAIL, "first password!").await.unwrap();
        let second = h.sign_up("A", EMAIL, "second password!").await.unwrap();

        // Old code is no longer valid
        let err = h
            .verify_otp(EMAIL, first.token.code.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));

        // New code verifies, and only the new password logs in
        h.verify_otp(EMAIL, second.token.code.as_str()).await.unwrap();

        let err = h.sign_in(EMAIL, "first password!").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        h.sign_in(EMAIL, "second password!").await.unwrap();
    }

    #[tokio::test]
    async fn test_login_unverified_fails_and_deletes_token() {
        let h = Harness::new();
        h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        assert_eq!(h.store.tokens_for(EMAIL).len(), 1);

        // Correct password, but the account never finished verification
        let err = h.sign_in(EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountNotVerified));
        assert!(h.store.tokens_for(EMAIL).is_empty());
        assert_eq!(h.store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();

        let wrong_password = h.sign_in(EMAIL, "not the password").await.unwrap_err();
        let unknown_email = h.sign_in("b@x.com", PASSWORD).await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_concurrent_sessions_are_allowed() {
        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();

        let first = h.sign_in(EMAIL, PASSWORD).await.unwrap();
        let second = h.sign_in(EMAIL, PASSWORD).await.unwrap();

        // 1 from verification + 2 logins, all live at once
        assert_eq!(h.store.session_count(), 3);
        assert!(h.current_session(&first.session.session_token).await.unwrap().is_some());
        assert!(h.current_session(&second.session.session_token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_signout_kills_the_session_for_good() {
        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        let verified = h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();
        let token = verified.session.session_token.clone();

        assert!(h.current_session(&token).await.unwrap().is_some());

        SignOutUseCase::new(h.repo()).execute(&token).await.unwrap();
        assert!(h.current_session(&token).await.unwrap().is_none());

        // Idempotent on repeat
        SignOutUseCase::new(h.repo()).execute(&token).await.unwrap();
        assert!(h.current_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let h = Harness::new();

        let signup = h.sign_up("A", EMAIL, PASSWORD).await.unwrap();
        let verified = h.verify_otp(EMAIL, signup.token.code.as_str()).await.unwrap();
        let token = verified.session.session_token.clone();

        for session in h.store.sessions.lock().unwrap().iter_mut() {
            session.expires_at = Utc::now() - Duration::seconds(1);
        }

        assert!(h.current_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_cookie_token_resolves_to_none() {
        let h = Harness::new();
        let unknown = SessionToken::new();
        assert!(h.current_session(&unknown).await.unwrap().is_none());
    }
}

// ============================================================================
// HTTP surface tests
// ============================================================================

#[cfg(test)]
mod http_tests {
    use super::*;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::presentation::router::auth_router_generic;

    fn app(store: &MemStore, config: &AuthConfig) -> Router {
        auth_router_generic(store.clone(), config.clone())
    }

    /// First name=value pair of a Set-Cookie header
    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn post_json(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_full_http_flow() {
        let store = MemStore::default();
        let config = AuthConfig::development();

        // Signup sets the temp cookie
        let response = app(&store, &config)
            .oneshot(post_json(
                "/signup",
                r#"{"fullName":"A","email":"a@x.com","password":"password1 extended"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("next-temp-auth="));
        let temp_cookie = cookie_pair(&cookies[0]);

        // Verify with the issued code: session cookie set, temp cleared
        let code = store.tokens_for("a@x.com")[0].code.clone();
        let response = app(&store, &config)
            .oneshot(post_json(
                "/otp/verify",
                &format!(r#"{{"otp":"{}"}}"#, code),
                Some(&temp_cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("next-auth-session="));
        assert!(cookies[1].starts_with("next-temp-auth=;"));
        let session_cookie = cookie_pair(&cookies[0]);

        // The session resolves
        let response = app(&store, &config)
            .oneshot(get("/session", Some(&session_cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["role"], "user");
        assert!(body["user"].get("passwordHash").is_none());

        // Signout clears both cookies
        let response = app(&store, &config)
            .oneshot(post_json("/signout", "", Some(&session_cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(set_cookies(&response).len(), 2);

        // The signed-out cookie can never resolve again
        let response = app(&store, &config)
            .oneshot(get("/session", Some(&session_cookie)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], false);
    }

    #[tokio::test]
    async fn test_http_invalid_otp_body() {
        let store = MemStore::default();
        let config = AuthConfig::development();

        let response = app(&store, &config)
            .oneshot(post_json(
                "/signup",
                r#"{"fullName":"A","email":"a@x.com","password":"password1 extended"}"#,
                None,
            ))
            .await
            .unwrap();
        let temp_cookie = cookie_pair(&set_cookies(&response)[0]);

        let response = app(&store, &config)
            .oneshot(post_json(
                "/otp/verify",
                r#"{"otp":"000000"}"#,
                Some(&temp_cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["failed"], true);
        assert_eq!(body["type"], "custom");
        assert_eq!(body["error"], "Invalid OTP");
    }

    #[tokio::test]
    async fn test_http_verify_without_temp_cookie() {
        let store = MemStore::default();
        let config = AuthConfig::development();

        let response = app(&store, &config)
            .oneshot(post_json("/otp/verify", r#"{"otp":"123456"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["failed"], true);
        assert_eq!(body["type"], "custom");
    }

    #[tokio::test]
    async fn test_http_duplicate_email_field_error() {
        let store = MemStore::default();
        let config = AuthConfig::development();

        let signup_body = r#"{"fullName":"A","email":"a@x.com","password":"password1 extended"}"#;
        let response = app(&store, &config)
            .oneshot(post_json("/signup", signup_body, None))
            .await
            .unwrap();
        let temp_cookie = cookie_pair(&set_cookies(&response)[0]);

        let code = store.tokens_for("a@x.com")[0].code.clone();
        app(&store, &config)
            .oneshot(post_json(
                "/otp/verify",
                &format!(r#"{{"otp":"{}"}}"#, code),
                Some(&temp_cookie),
            ))
            .await
            .unwrap();

        // Email is now verified and owned
        let response = app(&store, &config)
            .oneshot(post_json("/signup", signup_body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["type"], "input");
        assert_eq!(body["error"][0]["fieldName"], "email");
    }

    #[tokio::test]
    async fn test_require_session_middleware() {
        use axum::extract::Extension;
        use axum::routing::get as get_route;

        use crate::application::current_session::CurrentSession;
        use crate::domain::value_object::permission::PermissionSet;
        use crate::domain::value_object::user_role::UserRole;
        use crate::presentation::cookies;
        use crate::presentation::middleware::{AuthMiddlewareState, require_session};

        let store = MemStore::default();
        let config = AuthConfig::development();

        // Seed a verified user with a live session through the use cases
        let h = Harness {
            store: store.clone(),
            config: Arc::new(config.clone()),
        };
        let signup = h.sign_up("A", "a@x.com", "password1 extended").await.unwrap();
        let verified = h
            .verify_otp("a@x.com", signup.token.code.as_str())
            .await
            .unwrap();

        let session_cookie = cookie_pair(
            &cookies::session_cookie_header(
                &config,
                &verified.session,
                UserRole::User,
                &PermissionSet::default(),
            )
            .unwrap(),
        );

        let state = AuthMiddlewareState {
            repo: Arc::new(store.clone()),
            config: Arc::new(config.clone()),
        };
        let protected = Router::new()
            .route(
                "/me",
                get_route(|Extension(current): Extension<CurrentSession>| async move {
                    current.user.email.as_str().to_string()
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                state,
                require_session::<MemStore>,
            ));

        // No cookie: rejected with the auth marker header
        let response = protected.clone().oneshot(get("/me", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("X-Auth-Required").unwrap(),
            "true"
        );

        // Valid session cookie: the handler sees the resolved identity
        let response = protected
            .clone()
            .oneshot(get("/me", Some(&session_cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"a@x.com");
    }

    #[tokio::test]
    async fn test_http_login_sets_session_cookie() {
        let store = MemStore::default();
        let config = AuthConfig::development();

        let response = app(&store, &config)
            .oneshot(post_json(
                "/signup",
                r#"{"fullName":"A","email":"a@x.com","password":"password1 extended"}"#,
                None,
            ))
            .await
            .unwrap();
        let temp_cookie = cookie_pair(&set_cookies(&response)[0]);

        let code = store.tokens_for("a@x.com")[0].code.clone();
        app(&store, &config)
            .oneshot(post_json(
                "/otp/verify",
                &format!(r#"{{"otp":"{}"}}"#, code),
                Some(&temp_cookie),
            ))
            .await
            .unwrap();

        let response = app(&store, &config)
            .oneshot(post_json(
                "/login",
                r#"{"email":"a@x.com","password":"password1 extended"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookies(&response)[0].starts_with("next-auth-session="));

        // Wrong password and unknown email: same status, same body
        let wrong = app(&store, &config)
            .oneshot(post_json(
                "/login",
                r#"{"email":"a@x.com","password":"wrong password!"}"#,
                None,
            ))
            .await
            .unwrap();
        let unknown = app(&store, &config)
            .oneshot(post_json(
                "/login",
                r#"{"email":"nobody@x.com","password":"password1 extended"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await, body_json(unknown).await);
    }
}
