//! Route classification.
//!
//! | Prefix | Class |
//! |--------|-------|
//! | `/login`, `/public`, `/pkg`, `/api`, `/favicon.ico` | `Public` |
//! | `/admin` | `AdminOnly` |
//! | anything else | `StandardProtected` |
//!
//! Matching is a plain string prefix on the path; the query string and
//! fragment are ignored.

use crate::role::Role;

/// Login page.
pub const LOGIN_PATH: &str = "/login";
/// Landing page for standard roles.
pub const DEFAULT_LANDING_PATH: &str = "/";
/// Landing page for super-admins.
pub const ADMIN_LANDING_PATH: &str = "/admin";

const PUBLIC_PREFIXES: &[&str] = &[LOGIN_PATH, "/public", "/pkg", "/api", "/favicon.ico"];
const ADMIN_PREFIX: &str = "/admin";

/// Access class of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable without a credential.
    Public,
    /// Reserved for super-admins.
    AdminOnly,
    /// Requires a credential; any role except super-admin.
    StandardProtected,
}

impl RouteClass {
    #[must_use]
    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

/// Classifies `path`. Total over all strings.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    let path = strip_query(path);
    if PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        RouteClass::Public
    } else if path.starts_with(ADMIN_PREFIX) {
        RouteClass::AdminOnly
    } else {
        RouteClass::StandardProtected
    }
}

/// Returns the page a role lands on after login or a wrong-role redirect.
#[must_use]
pub fn landing_path(role: &Role) -> &'static str {
    if role.is_super_admin() {
        ADMIN_LANDING_PATH
    } else {
        DEFAULT_LANDING_PATH
    }
}

/// Builds the login URL that returns to `original` after sign-in.
#[must_use]
pub fn login_redirect(original: &str) -> String {
    format!("{LOGIN_PATH}?from={}", urlencoding::encode(original))
}

/// Validates a decoded `from` parameter as a post-login destination.
///
/// Only same-origin, non-public paths are accepted.
#[must_use]
pub fn return_target(from: &str) -> Option<&str> {
    let is_local = from.starts_with('/') && !from.starts_with("//") && !from.contains('\\');
    (is_local && !classify(from).is_public()).then_some(from)
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
