//! Role types for route authorization.
//!
//! The identity service assigns one role per user. Only `SUPER_ADMIN` is
//! distinguished by the front end; every other role is "standard" and
//! shares the same sections of the application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire name of the super-admin role.
pub const SUPER_ADMIN: &str = "SUPER_ADMIN";

/// A user's role as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Platform operator. Sees only the admin area.
    SuperAdmin,
    /// Any other role, kept verbatim (e.g. `ADMIN`, `AUDITOR`, `USER`).
    Standard(String),
}

impl Role {
    /// Returns true for the super-admin role.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => SUPER_ADMIN,
            Self::Standard(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        if name == SUPER_ADMIN {
            Self::SuperAdmin
        } else {
            Self::Standard(name)
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::SuperAdmin => SUPER_ADMIN.to_string(),
            Role::Standard(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
