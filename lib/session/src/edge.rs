//! Request-time access decision.
//!
//! Runs before anything renders. It checks only that some credential is
//! present; expiry and role are left to the refresh monitor and the role
//! guard.

use crate::route::{self, RouteClass};

/// Outcome of the edge check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    Allow,
    /// Send the browser to `location` (the login page with a `from` parameter).
    RedirectToLogin { location: String },
}

/// Decides whether a request for `path_and_query` may proceed.
///
/// `credential` is the bearer token found on the request, if any. An empty
/// value counts as absent.
#[must_use]
pub fn evaluate(path_and_query: &str, credential: Option<&str>) -> EdgeDecision {
    if route::classify(path_and_query) == RouteClass::Public {
        return EdgeDecision::Allow;
    }

    match credential {
        Some(token) if !token.trim().is_empty() => EdgeDecision::Allow,
        _ => EdgeDecision::RedirectToLogin {
            location: route::login_redirect(path_and_query),
        },
    }
}

/// Picks the bearer credential from a cookie value or an `Authorization`
/// header value. The cookie wins when both are present and non-empty.
#[must_use]
pub fn bearer_credential<'a>(
    cookie: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    let from_cookie = cookie.map(str::trim).filter(|value| !value.is_empty());
    let from_header = authorization
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
        })
        .filter(|value| !value.is_empty());

    from_cookie.or(from_header)
}
