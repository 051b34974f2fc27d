//! Permission Value Objects
//!
//! Typed access-control vocabulary: a `Permission` is an exact
//! `(AccessMethod, Resource)` pair, and a `PermissionSet` is the flat
//! allow-list attached to a user row.
//!
//! Decision rule (see [`is_access_granted`]): non-elevated roles are
//! granted unconditionally; elevated roles need the exact pair in their
//! set. This is a flat allow-list, not a hierarchical policy engine.
//!
//! Storage round-trips through the legacy code strings
//! (`"createCategory"`, `"deleteProduct"`, ...) so existing rows stay
//! readable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// AccessMethod / Resource
// ============================================================================

/// CRUD-style access method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMethod {
    Create,
    Read,
    Update,
    Delete,
}

impl AccessMethod {
    const ALL: [AccessMethod; 4] = [
        AccessMethod::Create,
        AccessMethod::Read,
        AccessMethod::Update,
        AccessMethod::Delete,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccessMethod::Create => "create",
            AccessMethod::Read => "read",
            AccessMethod::Update => "update",
            AccessMethod::Delete => "delete",
        }
    }
}

/// Protected resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Category,
    Product,
    Brand,
}

impl Resource {
    const ALL: [Resource; 3] = [Resource::Category, Resource::Product, Resource::Brand];

    /// Resource segment of the legacy code string (capitalized)
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Resource::Category => "Category",
            Resource::Product => "Product",
            Resource::Brand => "Brand",
        }
    }
}

// ============================================================================
// Permission
// ============================================================================

/// One `(method, resource)` grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub method: AccessMethod,
    pub resource: Resource,
}

impl Permission {
    pub const fn new(method: AccessMethod, resource: Resource) -> Self {
        Self { method, resource }
    }

    /// Legacy storage code, e.g. `"createCategory"`
    pub fn code(&self) -> String {
        format!("{}{}", self.method.code(), self.resource.code())
    }

    /// Parse a legacy storage code
    pub fn from_code(code: &str) -> Option<Self> {
        for method in AccessMethod::ALL {
            if let Some(rest) = code.strip_prefix(method.code()) {
                for resource in Resource::ALL {
                    if rest == resource.code() {
                        return Some(Self::new(method, resource));
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Permission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Permission::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown permission code: {code}")))
    }
}

// ============================================================================
// PermissionSet
// ============================================================================

/// Flat allow-list of grants attached to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(Vec<Permission>);

impl PermissionSet {
    pub fn new(permissions: Vec<Permission>) -> Self {
        Self(permissions)
    }

    /// Rebuild from stored code strings
    ///
    /// Unknown codes are skipped with a warning rather than failing the
    /// whole row; a dropped grant only narrows access.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Self {
        let permissions = codes
            .iter()
            .filter_map(|code| {
                let code = code.as_ref();
                let parsed = Permission::from_code(code);
                if parsed.is_none() {
                    tracing::warn!(code, "Skipping unknown permission code");
                }
                parsed
            })
            .collect();
        Self(permissions)
    }

    /// Code strings for storage
    pub fn codes(&self) -> Vec<String> {
        self.0.iter().map(Permission::code).collect()
    }

    pub fn allows(&self, method: AccessMethod, resource: Resource) -> bool {
        self.0.contains(&Permission::new(method, resource))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Decision rule
// ============================================================================

/// Flat allow-list check for a `(method, resource)` pair
///
/// Non-elevated roles bypass the list entirely; elevated roles need the
/// exact grant.
pub fn is_access_granted(
    role: UserRole,
    permissions: &PermissionSet,
    method: AccessMethod,
    resource: Resource,
) -> bool {
    if !role.is_elevated() {
        return true;
    }

    permissions.allows(method, resource)
}
