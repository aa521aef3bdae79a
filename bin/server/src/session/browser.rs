//! Browser-backed token store, navigator and session bootstrap.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use compliance_console_identity::HttpIdentityService;
use compliance_console_session::{
    AccessToken, Navigator, RefreshPolicy, RefreshToken, SessionContext, SessionLifecycle,
    SessionSnapshot, SessionStatus, SystemClock, TokenPair, TokenStore, route,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{error, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage};

use crate::settings::{ClientSettings, get_client_settings};

const ACCESS_KEY: &str = "accessToken";
const REFRESH_KEY: &str = "refreshToken";

/// Token store over `localStorage`, mirroring the access token into a
/// cookie so the edge filter can see it.
#[derive(Debug)]
pub struct BrowserTokenStore {
    cookie_name: String,
    secure: bool,
    epoch: AtomicU64,
}

impl BrowserTokenStore {
    pub fn new(cookie_name: impl Into<String>, secure: bool) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            secure,
            epoch: AtomicU64::new(0),
        }
    }

    fn write_cookie(&self, token: Option<&str>) {
        let Some(document) = html_document() else {
            return;
        };
        let secure = if self.secure { "; Secure" } else { "" };
        let cookie = match token {
            Some(token) => format!("{}={token}; path=/; SameSite=Lax{secure}", self.cookie_name),
            None => format!(
                "{}=; path=/; max-age=0; SameSite=Lax{secure}",
                self.cookie_name
            ),
        };
        report(document.set_cookie(&cookie), "write access cookie");
    }

    fn bump(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

impl TokenStore for BrowserTokenStore {
    fn get(&self) -> Option<TokenPair> {
        let storage = local_storage()?;
        let access = read_item(&storage, ACCESS_KEY)?;
        let refresh = read_item(&storage, REFRESH_KEY).map(RefreshToken::new);
        Some(TokenPair {
            access: AccessToken::new(access),
            refresh,
        })
    }

    fn set(&self, tokens: TokenPair) {
        if let Some(storage) = local_storage() {
            // Refresh first: `get` only sees a pair once the access entry exists.
            match &tokens.refresh {
                Some(refresh) => report(
                    storage.set_item(REFRESH_KEY, refresh.as_str()),
                    "store refresh token",
                ),
                None => report(storage.remove_item(REFRESH_KEY), "remove refresh token"),
            }
            report(
                storage.set_item(ACCESS_KEY, tokens.access.as_str()),
                "store access token",
            );
        }
        self.write_cookie(Some(tokens.access.as_str()));
        self.bump();
    }

    fn replace_access(&self, access: AccessToken) {
        if let Some(storage) = local_storage() {
            report(
                storage.set_item(ACCESS_KEY, access.as_str()),
                "store access token",
            );
        }
        self.write_cookie(Some(access.as_str()));
        self.bump();
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            report(storage.remove_item(ACCESS_KEY), "remove access token");
            report(storage.remove_item(REFRESH_KEY), "remove refresh token");
        }
        self.write_cookie(None);
        self.bump();
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

/// Full page navigation to the login page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect_to_login(&self) {
        let Some(location) = web_sys::window().map(|window| window.location()) else {
            return;
        };
        // Reloading the login page would restart the session check.
        let on_login = location
            .pathname()
            .is_ok_and(|path| path.starts_with(route::LOGIN_PATH));
        if !on_login {
            report(location.set_href(route::LOGIN_PATH), "navigate to login");
        }
    }
}

/// Fetches the client settings, wires the lifecycle and runs the first check.
pub(super) fn start(
    set_snapshot: WriteSignal<SessionSnapshot>,
    lifecycle_slot: RwSignal<Option<Arc<SessionLifecycle>>>,
    pathname: Memo<String>,
) {
    Effect::new(move || {
        spawn_local(async move {
            let settings = match get_client_settings().await {
                Ok(settings) => settings,
                Err(e) => {
                    error!(error = %e, "failed to load client settings");
                    set_snapshot.set(failed());
                    return;
                }
            };

            let Some((context, lifecycle)) = build(&settings) else {
                set_snapshot.set(failed());
                return;
            };

            let mut changes = context.subscribe();
            spawn_local(async move {
                while changes.changed().await.is_ok() {
                    let snapshot = changes.borrow_and_update().clone();
                    if set_snapshot.try_set(snapshot).is_some() {
                        break;
                    }
                }
            });

            lifecycle_slot.set(Some(lifecycle.clone()));

            if settings.refresh_interval_seconds > 0 {
                let background = lifecycle.clone();
                set_interval(
                    move || {
                        let lifecycle = background.clone();
                        let path = pathname.get_untracked();
                        spawn_local(async move {
                            lifecycle.on_navigation(&path).await;
                        });
                    },
                    Duration::from_secs(settings.refresh_interval_seconds),
                );
            }

            lifecycle.start().await;
        });
    });
}

fn build(settings: &ClientSettings) -> Option<(SessionContext, Arc<SessionLifecycle>)> {
    let identity = match HttpIdentityService::new(&settings.api_base_url) {
        Ok(identity) => identity,
        Err(e) => {
            error!(error = %e, "invalid identity service configuration");
            return None;
        }
    };

    let context = SessionContext::new();
    let lifecycle = SessionLifecycle::new(
        Arc::new(BrowserTokenStore::new(
            settings.access_cookie.clone(),
            settings.secure_cookies,
        )),
        Arc::new(identity),
        context.clone(),
        Arc::new(BrowserNavigator),
        Arc::new(SystemClock),
        RefreshPolicy::with_renewal_window_seconds(settings.renewal_window_seconds),
    );
    Some((context, Arc::new(lifecycle)))
}

fn failed() -> SessionSnapshot {
    SessionSnapshot {
        session: None,
        status: SessionStatus::Error,
    }
}

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

fn read_item(storage: &Storage, key: &str) -> Option<String> {
    storage
        .get_item(key)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
}

fn report(result: Result<(), JsValue>, action: &str) {
    if let Err(error) = result {
        warn!(?error, action, "browser call failed");
    }
}
