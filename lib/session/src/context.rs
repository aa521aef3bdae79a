//! Per-tab session state.
//!
//! `SessionContext` is created once per tab and handed to whoever needs it.
//! Clones share the same state. Readers either take a snapshot or subscribe
//! to a `watch` receiver that yields every change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::session::Session;

/// Progress of identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Settled. The session is either populated or absent.
    Idle,
    /// No authorization decision can be made yet.
    #[default]
    Loading,
    /// The identity fetch failed; there is no session.
    Error,
}

/// The session together with its status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub status: SessionStatus,
}

impl SessionSnapshot {
    /// Returns true once hydration has settled (successfully or not).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status != SessionStatus::Loading
    }
}

/// Shared holder of the current session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Creates a context in the `Loading` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::channel(SessionSnapshot::default()).0),
        }
    }

    /// Marks identity resolution as started.
    pub fn begin_loading(&self) {
        self.state.send_modify(|state| state.status = SessionStatus::Loading);
    }

    /// Settles with a populated or absent session.
    pub fn settle(&self, session: Option<Session>) {
        self.replace(SessionSnapshot {
            session,
            status: SessionStatus::Idle,
        });
    }

    /// Settles in the error state with no session.
    pub fn fail(&self) {
        self.replace(SessionSnapshot {
            session: None,
            status: SessionStatus::Error,
        });
    }

    /// Clears the session after logout.
    pub fn teardown(&self) {
        self.settle(None);
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status
    }

    /// Returns a receiver notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    fn replace(&self, snapshot: SessionSnapshot) {
        self.state.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::standard_session;

    #[test]
    fn starts_loading_without_session() {
        let context = SessionContext::new();
        assert_eq!(context.status(), SessionStatus::Loading);
        assert!(context.session().is_none());
        assert!(!context.snapshot().is_settled());
    }

    #[test]
    fn settle_populates_session() {
        let context = SessionContext::new();
        context.settle(Some(standard_session()));
        assert_eq!(context.status(), SessionStatus::Idle);
        assert_eq!(context.session(), Some(standard_session()));
    }

    #[test]
    fn fail_drops_session() {
        let context = SessionContext::new();
        context.settle(Some(standard_session()));
        context.fail();
        assert_eq!(context.status(), SessionStatus::Error);
        assert!(context.session().is_none());
        assert!(context.snapshot().is_settled());
    }

    #[test]
    fn clones_share_state() {
        let context = SessionContext::new();
        let other = context.clone();
        other.settle(Some(standard_session()));
        assert_eq!(context.session(), Some(standard_session()));
        other.teardown();
        assert!(context.session().is_none());
        assert_eq!(context.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let context = SessionContext::new();
        let mut rx = context.subscribe();

        context.settle(Some(standard_session()));
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow_and_update().session, Some(standard_session()));

        context.begin_loading();
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow_and_update().status, SessionStatus::Loading);
    }
}
