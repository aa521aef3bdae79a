//! Proactive access-token renewal.
//!
//! ```text
//! Unchecked ──► Valid ──► Refreshing ──► Valid
//!     │           │            │
//!     └───────────┴────────────┴──────► LoggedOut
//! ```
//!
//! A check runs on every navigation, after hydration and on an optional
//! interval. Every failure is terminal: the store is cleared, the session
//! context is torn down and the user is sent to the login page. Nothing is
//! retried.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::codec;
use crate::context::SessionContext;
use crate::error::SessionError;
use crate::service::{IdentityService, Navigator};
use crate::store::TokenStore;

/// Default time before `exp` at which renewal starts.
pub const DEFAULT_RENEWAL_WINDOW_SECONDS: i64 = 30;

/// Monitor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// No check has run since mount or login.
    #[default]
    Unchecked,
    /// The last check found a usable token.
    Valid,
    /// A refresh request is outstanding.
    Refreshing,
    /// The session ended; the store is empty.
    LoggedOut,
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The access token is usable as is.
    Valid,
    /// A new access token was stored.
    Refreshed,
    /// Another check is already refreshing this token.
    InFlight,
    /// The token changed while the refresh was running; the result was dropped.
    Stale,
    /// The session ended.
    LoggedOut(SessionError),
}

/// Tunables for the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// How long before `exp` a token counts as due for renewal.
    pub renewal_window: Duration,
}

impl RefreshPolicy {
    #[must_use]
    pub fn with_renewal_window_seconds(seconds: i64) -> Self {
        Self {
            renewal_window: Duration::seconds(seconds.max(0)),
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::with_renewal_window_seconds(DEFAULT_RENEWAL_WINDOW_SECONDS)
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: MonitorState,
    /// Epoch of the token currently being refreshed.
    in_flight: Option<u64>,
}

/// Checks the stored token and renews it before it expires.
pub struct RefreshMonitor {
    store: Arc<dyn TokenStore>,
    identity: Arc<dyn IdentityService>,
    context: SessionContext,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    policy: RefreshPolicy,
    inner: Mutex<Inner>,
}

impl RefreshMonitor {
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        identity: Arc<dyn IdentityService>,
        context: SessionContext,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            store,
            identity,
            context,
            navigator,
            clock,
            policy,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.lock().state
    }

    /// Returns to `Unchecked` after a fresh login.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = MonitorState::Unchecked;
        inner.in_flight = None;
    }

    /// Records a logout performed elsewhere.
    pub fn mark_logged_out(&self) {
        let mut inner = self.lock();
        inner.state = MonitorState::LoggedOut;
        inner.in_flight = None;
    }

    /// Checks the stored token, refreshing it if it is expired or about to be.
    pub async fn check(&self) -> CheckOutcome {
        let Some(tokens) = self.store.get() else {
            return self.log_out(SessionError::NoCredential);
        };

        let claims = match codec::decode(tokens.access.as_str()) {
            Ok(claims) => claims,
            Err(error) => return self.log_out(error.into()),
        };

        let now = self.clock.now();
        if !claims.expires_within(now, self.policy.renewal_window) {
            return self.mark_valid();
        }

        let Some(refresh) = tokens.refresh else {
            if claims.is_expired_at(now) {
                return self.log_out(SessionError::ExpiredToken);
            }
            // Nothing to renew with; usable until hard expiry.
            return self.mark_valid();
        };

        // Claim the refresh before the first await.
        let epoch = self.store.epoch();
        {
            let mut inner = self.lock();
            if inner.in_flight == Some(epoch) {
                return CheckOutcome::InFlight;
            }
            inner.in_flight = Some(epoch);
            inner.state = MonitorState::Refreshing;
        }

        debug!(epoch, exp = claims.exp, "refreshing access token");
        let result = self.identity.refresh(&refresh).await;

        if self.store.epoch() != epoch {
            debug!(epoch, "token changed during refresh, discarding result");
            let mut inner = self.lock();
            if inner.in_flight == Some(epoch) {
                inner.in_flight = None;
                if inner.state == MonitorState::Refreshing {
                    inner.state = MonitorState::Unchecked;
                }
            }
            return CheckOutcome::Stale;
        }

        let access = match result {
            Ok(access) => access,
            Err(error) => {
                return self.log_out(SessionError::RefreshRejected {
                    reason: error.to_string(),
                });
            }
        };

        if let Err(error) = codec::decode(access.as_str()) {
            return self.log_out(SessionError::RefreshRejected {
                reason: error.to_string(),
            });
        }

        self.store.replace_access(access);
        {
            let mut inner = self.lock();
            inner.in_flight = None;
            inner.state = MonitorState::Valid;
        }
        info!("access token refreshed");
        CheckOutcome::Refreshed
    }

    fn mark_valid(&self) -> CheckOutcome {
        let mut inner = self.lock();
        if inner.in_flight.is_none() {
            inner.state = MonitorState::Valid;
        }
        CheckOutcome::Valid
    }

    fn log_out(&self, reason: SessionError) -> CheckOutcome {
        warn!(%reason, "ending session");
        self.store.clear();
        self.context.teardown();
        self.mark_logged_out();
        self.navigator.redirect_to_login();
        CheckOutcome::LoggedOut(reason)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryTokenStore;
    use crate::test_support::{
        FakeIdentity, RecordingNavigator, access_expiring_in, now, standard_session,
    };
    use crate::token::{AccessToken, RefreshToken, TokenPair};

    struct Harness {
        store: Arc<MemoryTokenStore>,
        identity: Arc<FakeIdentity>,
        navigator: Arc<RecordingNavigator>,
        context: SessionContext,
        monitor: RefreshMonitor,
    }

    fn harness(tokens: Option<TokenPair>, identity: FakeIdentity) -> Harness {
        let store = Arc::new(MemoryTokenStore::new());
        if let Some(tokens) = tokens {
            store.set(tokens);
        }
        let identity = Arc::new(identity);
        let navigator = Arc::new(RecordingNavigator::default());
        let context = SessionContext::new();
        context.settle(Some(standard_session()));
        let monitor = RefreshMonitor::new(
            store.clone(),
            identity.clone(),
            context.clone(),
            navigator.clone(),
            Arc::new(FixedClock::new(now())),
            RefreshPolicy::default(),
        );
        Harness {
            store,
            identity,
            navigator,
            context,
            monitor,
        }
    }

    fn with_refresh(access: AccessToken) -> TokenPair {
        TokenPair::new(access, RefreshToken::new("refresh"))
    }

    #[tokio::test]
    async fn future_expiry_is_valid_without_refresh() {
        let h = harness(
            Some(with_refresh(access_expiring_in(3_600))),
            FakeIdentity::new(),
        );

        assert_eq!(h.monitor.check().await, CheckOutcome::Valid);
        assert_eq!(h.monitor.state(), MonitorState::Valid);
        assert_eq!(h.identity.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn expired_without_refresh_token_logs_out() {
        let h = harness(
            Some(TokenPair::access_only(access_expiring_in(-10))),
            FakeIdentity::new(),
        );

        assert_eq!(
            h.monitor.check().await,
            CheckOutcome::LoggedOut(SessionError::ExpiredToken)
        );
        assert_eq!(h.monitor.state(), MonitorState::LoggedOut);
        assert_eq!(h.store.get(), None);
        assert!(h.context.session().is_none());
        assert_eq!(h.navigator.redirects(), 1);
    }

    #[tokio::test]
    async fn missing_token_logs_out() {
        let h = harness(None, FakeIdentity::new());
        assert_eq!(
            h.monitor.check().await,
            CheckOutcome::LoggedOut(SessionError::NoCredential)
        );
        assert_eq!(h.navigator.redirects(), 1);
    }

    #[tokio::test]
    async fn malformed_token_logs_out_and_clears_store() {
        let h = harness(
            Some(with_refresh(AccessToken::new("not-a-jwt"))),
            FakeIdentity::new(),
        );

        let outcome = h.monitor.check().await;
        assert!(matches!(
            outcome,
            CheckOutcome::LoggedOut(SessionError::MalformedToken { .. })
        ));
        assert_eq!(h.store.get(), None);
        assert_eq!(h.identity.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn within_window_without_refresh_token_stays_valid() {
        let h = harness(
            Some(TokenPair::access_only(access_expiring_in(10))),
            FakeIdentity::new(),
        );
        assert_eq!(h.monitor.check().await, CheckOutcome::Valid);
        assert!(h.store.get().is_some());
    }

    #[tokio::test]
    async fn expiring_token_is_refreshed() {
        let fresh = access_expiring_in(900);
        let h = harness(
            Some(with_refresh(access_expiring_in(10))),
            FakeIdentity::new().with_refreshed(fresh.clone()),
        );

        assert_eq!(h.monitor.check().await, CheckOutcome::Refreshed);
        assert_eq!(h.monitor.state(), MonitorState::Valid);
        let tokens = h.store.get().expect("tokens");
        assert_eq!(tokens.access, fresh);
        assert_eq!(tokens.refresh, Some(RefreshToken::new("refresh")));
        assert_eq!(h.navigator.redirects(), 0);
    }

    #[tokio::test]
    async fn rejected_refresh_logs_out() {
        let h = harness(
            Some(with_refresh(access_expiring_in(-10))),
            FakeIdentity::new(),
        );

        let outcome = h.monitor.check().await;
        assert!(matches!(
            outcome,
            CheckOutcome::LoggedOut(SessionError::RefreshRejected { .. })
        ));
        assert_eq!(h.store.get(), None);
        assert_eq!(h.navigator.redirects(), 1);
        assert_eq!(h.identity.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn malformed_replacement_is_a_refresh_failure() {
        let h = harness(
            Some(with_refresh(access_expiring_in(-10))),
            FakeIdentity::new().with_refreshed(AccessToken::new("garbage")),
        );

        assert!(matches!(
            h.monitor.check().await,
            CheckOutcome::LoggedOut(SessionError::RefreshRejected { .. })
        ));
        assert_eq!(h.store.get(), None);
    }

    #[tokio::test]
    async fn concurrent_checks_issue_one_refresh() {
        let h = harness(
            Some(with_refresh(access_expiring_in(-10))),
            FakeIdentity::new().with_refreshed(access_expiring_in(900)),
        );

        let (first, second) = tokio::join!(h.monitor.check(), h.monitor.check());

        assert_eq!(h.identity.refresh_calls(), 1);
        assert_eq!(first, CheckOutcome::Refreshed);
        assert_eq!(second, CheckOutcome::InFlight);
        assert_eq!(h.monitor.state(), MonitorState::Valid);
    }

    #[tokio::test]
    async fn refresh_after_teardown_is_discarded() {
        let h = harness(
            Some(with_refresh(access_expiring_in(-10))),
            FakeIdentity::new().with_refreshed(access_expiring_in(900)),
        );
        *h.identity.clear_during_refresh.lock().unwrap() = Some(h.store.clone());

        assert_eq!(h.monitor.check().await, CheckOutcome::Stale);
        assert_eq!(h.monitor.state(), MonitorState::Unchecked);
        assert_eq!(h.store.get(), None);
        assert_eq!(h.navigator.redirects(), 0);
    }

    #[tokio::test]
    async fn reset_returns_to_unchecked() {
        let h = harness(None, FakeIdentity::new());
        h.monitor.check().await;
        assert_eq!(h.monitor.state(), MonitorState::LoggedOut);
        h.monitor.reset();
        assert_eq!(h.monitor.state(), MonitorState::Unchecked);
    }

    #[test]
    fn default_policy_uses_thirty_second_window() {
        assert_eq!(
            RefreshPolicy::default().renewal_window,
            Duration::seconds(30)
        );
        assert_eq!(
            RefreshPolicy::with_renewal_window_seconds(-5).renewal_window,
            Duration::zero()
        );
    }
}
