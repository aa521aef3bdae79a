//! Seams to the outside world: the identity service and page navigation.

use async_trait::async_trait;
use rootcause::prelude::Report;
use serde::Serialize;
use std::fmt;

use crate::error::IdentityError;
use crate::session::Session;
use crate::token::{AccessToken, RefreshToken, TokenPair};

/// Email and password submitted on the login page.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Remote identity service.
///
/// Futures are not required to be `Send` so browser implementations can
/// hold JavaScript handles across await points.
#[async_trait(?Send)]
pub trait IdentityService: Send + Sync {
    /// Resolves an access token into the canonical profile of its bearer.
    async fn fetch_profile(&self, access: &AccessToken) -> Result<Session, Report<IdentityError>>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh(&self, refresh: &RefreshToken) -> Result<AccessToken, Report<IdentityError>>;

    /// Exchanges credentials for a new token pair.
    async fn login(&self, credentials: &LoginCredentials)
    -> Result<TokenPair, Report<IdentityError>>;
}

/// Forces top-level navigation.
pub trait Navigator: Send + Sync {
    /// Sends the user to the login page.
    fn redirect_to_login(&self);
}
