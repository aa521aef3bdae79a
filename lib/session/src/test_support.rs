//! Fakes and token builders shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use compliance_console_core::{CompanyId, UserId};
use rootcause::prelude::Report;

use crate::error::IdentityError;
use crate::role::Role;
use crate::service::{IdentityService, LoginCredentials, Navigator};
use crate::session::Session;
use crate::store::{MemoryTokenStore, TokenStore};
use crate::token::{AccessToken, RefreshToken, TokenPair};

/// The instant every test clock is frozen at.
pub fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid timestamp")
}

/// Builds an unsigned token around an arbitrary JSON payload.
pub fn token_with_payload(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

/// Builds an unsigned token expiring at `exp`.
pub fn token_expiring_at(exp: i64) -> String {
    token_with_payload(&serde_json::json!({ "exp": exp }))
}

/// Builds an access token expiring `offset_secs` after [`now`].
pub fn access_expiring_in(offset_secs: i64) -> AccessToken {
    AccessToken::new(token_expiring_at(now().timestamp() + offset_secs))
}

pub fn standard_session() -> Session {
    Session::new(
        UserId::new(7),
        "auditor@example.com".to_string(),
        "Ada Auditor".to_string(),
        Role::Standard("AUDITOR".to_string()),
        false,
        CompanyId::new(3),
    )
}

pub fn super_admin_session() -> Session {
    Session::new(
        UserId::new(1),
        "root@example.com".to_string(),
        "Root".to_string(),
        Role::SuperAdmin,
        true,
        CompanyId::new(1),
    )
}

/// Scripted identity service that counts calls.
pub struct FakeIdentity {
    pub profile: Mutex<Option<Session>>,
    pub refreshed: Mutex<Option<AccessToken>>,
    pub login_tokens: Mutex<Option<TokenPair>>,
    pub profile_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    /// Store cleared while a refresh is in flight, to simulate a logout race.
    pub clear_during_refresh: Mutex<Option<Arc<MemoryTokenStore>>>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(None),
            refreshed: Mutex::new(None),
            login_tokens: Mutex::new(None),
            profile_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            clear_during_refresh: Mutex::new(None),
        }
    }

    pub fn with_profile(self, session: Session) -> Self {
        *self.profile.lock().unwrap() = Some(session);
        self
    }

    pub fn with_refreshed(self, token: AccessToken) -> Self {
        *self.refreshed.lock().unwrap() = Some(token);
        self
    }

    pub fn with_login(self, tokens: TokenPair) -> Self {
        *self.login_tokens.lock().unwrap() = Some(tokens);
        self
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl IdentityService for FakeIdentity {
    async fn fetch_profile(&self, _access: &AccessToken) -> Result<Session, Report<IdentityError>> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let profile = self.profile.lock().unwrap().clone();
        profile.ok_or_else(|| IdentityError::Status { status: 401 }.into())
    }

    async fn refresh(&self, _refresh: &RefreshToken) -> Result<AccessToken, Report<IdentityError>> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        // Suspend so a concurrent check can observe the in-flight refresh.
        tokio::task::yield_now().await;
        let store = self.clear_during_refresh.lock().unwrap().clone();
        if let Some(store) = store {
            store.clear();
        }
        let refreshed = self.refreshed.lock().unwrap().clone();
        refreshed.ok_or_else(|| IdentityError::Status { status: 401 }.into())
    }

    async fn login(
        &self,
        _credentials: &LoginCredentials,
    ) -> Result<TokenPair, Report<IdentityError>> {
        let tokens = self.login_tokens.lock().unwrap().clone();
        tokens.ok_or_else(|| IdentityError::Status { status: 401 }.into())
    }
}

/// Navigator that records login redirects.
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
