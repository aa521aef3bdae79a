//! reqwest-backed identity service client.

use async_trait::async_trait;
use compliance_console_core::Result;
use compliance_console_session::{
    AccessToken, IdentityError, IdentityService, LoginCredentials, RefreshToken, Session,
    TokenPair,
};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::types::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

/// Identity service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    client: Client,
    me_url: Url,
    refresh_url: Url,
    login_url: Url,
}

impl HttpIdentityService {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str) -> Result<Self, IdentityError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client that reuses an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, IdentityError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| IdentityError::InvalidUrl {
            details: format!("{base_url}: {e}"),
        })?;

        let join = |path: &str| {
            base.join(path).map_err(|e| IdentityError::InvalidUrl {
                details: e.to_string(),
            })
        };

        Ok(Self {
            me_url: join("auth/me")?,
            refresh_url: join("auth/refresh")?,
            login_url: join("auth/login")?,
            client,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, IdentityError> {
        let response = request.send().await.map_err(|e| IdentityError::Transport {
            details: e.to_string(),
        })?;
        let response = check_status(response)?;
        let body = response
            .json::<T>()
            .await
            .map_err(|e| IdentityError::InvalidBody {
                details: e.to_string(),
            })?;
        Ok(body)
    }
}

fn check_status(response: Response) -> std::result::Result<Response, IdentityError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        debug!(status = status.as_u16(), url = %response.url(), "identity service rejected request");
        Err(IdentityError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait(?Send)]
impl IdentityService for HttpIdentityService {
    #[instrument(skip_all)]
    async fn fetch_profile(&self, access: &AccessToken) -> Result<Session, IdentityError> {
        let request = self
            .client
            .get(self.me_url.clone())
            .bearer_auth(access.as_str());
        self.send(request).await
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh: &RefreshToken) -> Result<AccessToken, IdentityError> {
        let request = self.client.post(self.refresh_url.clone()).json(&RefreshRequest {
            refresh_token: refresh.as_str(),
        });
        let body: RefreshResponse = self.send(request).await?;
        Ok(AccessToken::new(body.access_token))
    }

    #[instrument(skip_all, fields(email = %credentials.email))]
    async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenPair, IdentityError> {
        let request = self.client.post(self.login_url.clone()).json(&LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        });
        let body: LoginResponse = self.send(request).await?;
        Ok(TokenPair {
            access: AccessToken::new(body.access_token),
            refresh: body.refresh_token.map(RefreshToken::new),
        })
    }
}
