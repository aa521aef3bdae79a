//! Runtime settings the browser needs to build its session.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// Settings shipped to the browser at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the remote API.
    pub api_base_url: String,
    /// Name of the cookie mirroring the access token.
    pub access_cookie: String,
    /// Whether the cookie mirror carries the Secure flag.
    pub secure_cookies: bool,
    /// Seconds before expiry at which renewal starts.
    pub renewal_window_seconds: i64,
    /// Background check interval in seconds; zero disables it.
    pub refresh_interval_seconds: u64,
}

/// Server function returning the client settings.
#[server]
pub async fn get_client_settings() -> Result<ClientSettings, ServerFnError> {
    use axum::Extension;

    let Extension(settings): Extension<ClientSettings> = leptos_axum::extract().await?;
    Ok(settings)
}
