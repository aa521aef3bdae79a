//! In-app role guard decision.
//!
//! Super-admins and everyone else live in disjoint parts of the app: a
//! super-admin is always sent to `/admin`, and nobody else may stay on an
//! admin path. Nothing is decided until hydration has settled.

use crate::context::SessionSnapshot;
use crate::route::{self, ADMIN_LANDING_PATH, DEFAULT_LANDING_PATH, RouteClass};

/// What the guard does for the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Hydration is still running; render nothing protected yet.
    Pending,
    /// Render the route.
    Allow,
    /// Replace the current location with `to`.
    Redirect { to: &'static str },
}

/// Evaluates the guard for `path` against the current session state.
#[must_use]
pub fn evaluate(snapshot: &SessionSnapshot, path: &str) -> GuardDecision {
    if !snapshot.is_settled() {
        return GuardDecision::Pending;
    }

    let is_super_admin = snapshot
        .session
        .as_ref()
        .is_some_and(|session| session.is_super_admin());

    match (route::classify(path), is_super_admin) {
        (RouteClass::AdminOnly, false) => GuardDecision::Redirect {
            to: DEFAULT_LANDING_PATH,
        },
        (RouteClass::AdminOnly, true) => GuardDecision::Allow,
        (_, true) => GuardDecision::Redirect {
            to: ADMIN_LANDING_PATH,
        },
        (_, false) => GuardDecision::Allow,
    }
}
