//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (e.g. `AUTH__RENEWAL_WINDOW_SECONDS=60`).

use serde::Deserialize;

use crate::edge::EdgeSettings;
use crate::settings::ClientSettings;

/// Server configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the remote API that hosts the identity endpoints.
    pub api_base_url: String,

    /// Token and cookie configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Token and cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Name of the cookie that mirrors the access token for the edge filter.
    #[serde(default = "default_access_cookie")]
    pub access_cookie: String,

    /// How long before expiry the browser starts renewing the access token.
    #[serde(default = "default_renewal_window_seconds")]
    pub renewal_window_seconds: i64,

    /// Interval of the background token check in the browser, in seconds.
    /// Zero disables the background check; navigation still triggers it.
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,

    /// Whether to set the Secure flag on the access cookie (requires HTTPS).
    /// Defaults to true; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_access_cookie() -> String {
    "accessToken".to_string()
}

fn default_renewal_window_seconds() -> i64 {
    30
}

fn default_refresh_interval_seconds() -> u64 {
    30
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_cookie: default_access_cookie(),
            renewal_window_seconds: default_renewal_window_seconds(),
            refresh_interval_seconds: default_refresh_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_builder(config::Config::builder().add_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        ))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Settings the edge filter needs.
    #[must_use]
    pub fn edge_settings(&self) -> EdgeSettings {
        EdgeSettings::new(self.auth.access_cookie.clone())
    }

    /// Settings handed to the browser through a server function.
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_base_url: self.api_base_url.clone(),
            access_cookie: self.auth.access_cookie.clone(),
            secure_cookies: self.auth.secure_cookies,
            renewal_window_seconds: self.auth.renewal_window_seconds,
            refresh_interval_seconds: self.auth.refresh_interval_seconds,
        }
    }
}
