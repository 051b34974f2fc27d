//! User Entity
//!
//! Single-row user record: profile, credentials, verification state, and
//! the access-control attributes. The password hash travels with the
//! entity but is stripped before anything leaves the auth boundary
//! (see `SessionUser` in the application layer).

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, full_name::FullName, permission::PermissionSet, user_id::UserId,
    user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Unique, lowercase email (the login identifier)
    pub email: Email,
    /// Display name
    pub full_name: FullName,
    /// Argon2id password hash
    pub password_hash: UserPassword,
    /// When the email was proven via OTP; `None` means unverified
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Role (user, moderator, admin)
    pub role: UserRole,
    /// Flat permission allow-list (only consulted for elevated roles)
    pub permissions: PermissionSet,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified user
    pub fn new(email: Email, full_name: FullName, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            full_name,
            password_hash,
            email_verified_at: None,
            role: UserRole::default(),
            permissions: PermissionSet::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the email has been proven
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Stamp the verification timestamp
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        self.email_verified_at = Some(at);
        self.updated_at = at;
    }

    /// Replace the password hash (repeated signup before verification)
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn test_user() -> User {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        User::new(
            Email::new("a@example.com").unwrap(),
            FullName::new("A B").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_new_user_is_unverified() {
        let user = test_user();
        assert!(!user.is_verified());
        assert_eq!(user.role, UserRole::User);
        assert!(user.permissions.is_empty());
    }

    #[test]
    fn test_mark_verified() {
        let mut user = test_user();
        let at = Utc::now();
        user.mark_verified(at);
        assert!(user.is_verified());
        assert_eq!(user.email_verified_at, Some(at));
    }
}
