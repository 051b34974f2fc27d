//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User, verification_token::VerificationToken};
use crate::domain::repository::{
    AuthUnitOfWork, SessionRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{
    email::Email, full_name::FullName, otp_code::OtpCode, permission::PermissionSet,
    session_token::SessionToken, user_id::UserId, user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    full_name,
    password_hash,
    email_verified_at,
    user_role,
    permissions,
    created_at,
    updated_at
"#;

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                full_name,
                password_hash,
                email_verified_at,
                user_role,
                permissions,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.full_name.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.email_verified_at)
        .bind(user.role.id())
        .bind(user.permissions.codes())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update_password(
        &self,
        email: &Email,
        password_hash: &UserPassword,
    ) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                password_hash = $2,
                updated_at = $3
            WHERE email = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email.as_str())
        .bind(password_hash.as_phc_string())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        // Callers only update a user they just fetched
        row.ok_or_else(|| AuthError::Internal("Password update returned no row".to_string()))?
            .into_user()
    }
}

// ============================================================================
// Verification Token Repository Implementation
// ============================================================================

impl VerificationTokenRepository for PgAuthRepository {
    async fn create(&self, token: &VerificationToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (identifier, code, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.identifier.as_str())
        .bind(token.code.as_str())
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_for_identifier(&self, identifier: &Email) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM verification_tokens WHERE identifier = $1")
            .bind(identifier.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.session_token.as_str())
        .bind(session.user_id.as_uuid())
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_live_by_token(&self, token: &SessionToken) -> AuthResult<Option<Session>> {
        // Expired rows are filtered here, never swept: expiry is a hard
        // cutoff at read time
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_token, user_id, expires_at, created_at
            FROM sessions
            WHERE session_token = $1 AND expires_at > $2
            "#,
        )
        .bind(token.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete_by_token(&self, token: &SessionToken) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE session_token = $1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Unit of Work Implementation
// ============================================================================

impl AuthUnitOfWork for PgAuthRepository {
    async fn redeem_verification(
        &self,
        identifier: &Email,
        code: &OtpCode,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let token = sqlx::query_as::<_, VerificationTokenRow>(
            r#"
            DELETE FROM verification_tokens
            WHERE identifier = $1 AND code = $2
            RETURNING identifier, code, expires_at, created_at
            "#,
        )
        .bind(identifier.as_str())
        .bind(code.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(token) = token else {
            tx.commit().await?;
            return Ok(None);
        };

        // An expired code stays consumed; commit keeps the delete
        if token.expires_at <= now {
            tx.commit().await?;
            return Ok(None);
        }

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                email_verified_at = $2,
                updated_at = $2
            WHERE email = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(identifier.as_str())
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AuthError::Internal("Verification token matched a missing user".to_string())
        })?;

        tx.commit().await?;

        user.into_user().map(Some)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    full_name: String,
    password_hash: String,
    email_verified_at: Option<DateTime<Utc>>,
    user_role: i16,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_id(self.user_role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            full_name: FullName::from_db(self.full_name),
            password_hash,
            email_verified_at: self.email_verified_at,
            role,
            permissions: PermissionSet::from_codes(&self.permissions),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VerificationTokenRow {
    #[allow(dead_code)]
    identifier: String,
    #[allow(dead_code)]
    code: String,
    expires_at: DateTime<Utc>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_token: SessionToken::from_value(self.session_token),
            user_id: UserId::from_uuid(self.user_id),
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
