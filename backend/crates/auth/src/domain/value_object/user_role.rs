use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    Moderator = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Moderator => "moderator",
            Admin => "admin",
        }
    }

    /// Elevated roles are subject to permission-list checks;
    /// ordinary users bypass them entirely.
    #[inline]
    pub const fn is_elevated(&self) -> bool {
        use UserRole::*;
        matches!(self, Moderator | Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(User),
            1 => Some(Moderator),
            2 => Some(Admin),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "user" => Some(User),
            "moderator" => Some(Moderator),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
