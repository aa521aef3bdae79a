//! Credential types issued by the identity service.
//!
//! Tokens are opaque strings. `Debug` output is redacted so a token never
//! ends up in a log line by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short-lived bearer credential.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Long-lived credential used only to obtain a new access token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken(***)")
    }
}

/// The access token together with its (optional) refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Current access token.
    pub access: AccessToken,
    /// Refresh token, if the identity service issued one.
    pub refresh: Option<RefreshToken>,
}

impl TokenPair {
    /// Creates a pair with both tokens.
    #[must_use]
    pub fn new(access: AccessToken, refresh: RefreshToken) -> Self {
        Self {
            access,
            refresh: Some(refresh),
        }
    }

    /// Creates a pair without a refresh token.
    #[must_use]
    pub fn access_only(access: AccessToken) -> Self {
        Self {
            access,
            refresh: None,
        }
    }
}
