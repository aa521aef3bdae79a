//! Wires the store, hydrator, monitor and context together for one tab.

use std::sync::Arc;

use rootcause::prelude::Report;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::context::{SessionContext, SessionStatus};
use crate::error::IdentityError;
use crate::hydrator::SessionHydrator;
use crate::monitor::{CheckOutcome, RefreshMonitor, RefreshPolicy};
use crate::route;
use crate::service::{IdentityService, LoginCredentials, Navigator};
use crate::session::Session;
use crate::store::TokenStore;

/// Entry points the UI calls: mount, navigation, interval tick, login and
/// logout.
pub struct SessionLifecycle {
    store: Arc<dyn TokenStore>,
    identity: Arc<dyn IdentityService>,
    context: SessionContext,
    navigator: Arc<dyn Navigator>,
    hydrator: SessionHydrator,
    monitor: RefreshMonitor,
}

impl SessionLifecycle {
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        identity: Arc<dyn IdentityService>,
        context: SessionContext,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        policy: RefreshPolicy,
    ) -> Self {
        let hydrator = SessionHydrator::new(store.clone(), identity.clone(), context.clone());
        let monitor = RefreshMonitor::new(
            store.clone(),
            identity.clone(),
            context.clone(),
            navigator.clone(),
            clock,
            policy,
        );
        Self {
            store,
            identity,
            context,
            navigator,
            hydrator,
            monitor,
        }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn monitor(&self) -> &RefreshMonitor {
        &self.monitor
    }

    /// Runs once when the application mounts.
    ///
    /// An anonymous tab settles without a redirect so public pages stay
    /// reachable; the edge filter has already turned away requests for
    /// protected paths.
    pub async fn start(&self) -> Option<Session> {
        if self.store.get().is_none() {
            return self.hydrator.hydrate().await;
        }
        match self.monitor.check().await {
            CheckOutcome::LoggedOut(_) => None,
            _ => self.hydrator.hydrate().await,
        }
    }

    /// Runs on every client-side navigation and interval tick.
    ///
    /// Client-side navigation never reaches the edge filter, so a missing
    /// credential on a protected path ends the session here.
    pub async fn on_navigation(&self, path: &str) -> CheckOutcome {
        if self.store.get().is_none() && route::classify(path).is_public() {
            debug!(path, "no credential on public path, skipping token check");
            return CheckOutcome::Valid;
        }

        let outcome = self.monitor.check().await;
        debug!(path, ?outcome, "token checked");

        // Retry a failed identity fetch while the token is still good.
        let snapshot = self.context.snapshot();
        if matches!(outcome, CheckOutcome::Valid | CheckOutcome::Refreshed)
            && snapshot.status == SessionStatus::Error
            && snapshot.session.is_none()
        {
            self.hydrator.hydrate().await;
        }
        outcome
    }

    /// Signs in and hydrates the new session.
    ///
    /// # Errors
    ///
    /// Returns the identity service error if the credentials are rejected.
    /// The store is left untouched in that case.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Session>, Report<IdentityError>> {
        let tokens = self.identity.login(credentials).await?;
        self.store.set(tokens);
        self.monitor.reset();
        info!("signed in");
        Ok(self.hydrator.hydrate().await)
    }

    /// Ends the session and returns to the login page.
    pub fn logout(&self) {
        self.store.clear();
        self.context.teardown();
        self.monitor.mark_logged_out();
        info!("signed out");
        self.navigator.redirect_to_login();
    }
}
