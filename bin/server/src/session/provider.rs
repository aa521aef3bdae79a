//! Session provider component and context handle.

use std::sync::Arc;

use compliance_console_session::{SessionLifecycle, SessionSnapshot};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_location;

/// Reactive access to the tab's session, provided as context.
#[derive(Clone, Copy)]
pub struct SessionHandle {
    snapshot: ReadSignal<SessionSnapshot>,
    lifecycle: RwSignal<Option<Arc<SessionLifecycle>>>,
}

impl SessionHandle {
    /// Current session state. Tracked when read inside a reactive scope.
    #[must_use]
    pub fn snapshot(&self) -> ReadSignal<SessionSnapshot> {
        self.snapshot
    }

    /// The lifecycle, once the browser has wired it up.
    #[must_use]
    pub fn lifecycle(&self) -> Option<Arc<SessionLifecycle>> {
        self.lifecycle.get_untracked()
    }

    /// Signs out and returns to the login page.
    pub fn logout(&self) {
        if let Some(lifecycle) = self.lifecycle() {
            lifecycle.logout();
        }
    }
}

/// Returns the session handle provided by [`SessionProvider`].
///
/// # Panics
///
/// Panics if called outside a `SessionProvider`.
#[must_use]
pub fn use_session() -> SessionHandle {
    expect_context()
}

/// Owns the tab's session and re-checks the token on every navigation.
///
/// Must be rendered inside the `Router`. On the server the session stays
/// `Loading`, so protected content is never rendered before hydration.
#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    let (snapshot, set_snapshot) = signal(SessionSnapshot::default());
    let lifecycle = RwSignal::new(None::<Arc<SessionLifecycle>>);
    provide_context(SessionHandle {
        snapshot,
        lifecycle,
    });

    let pathname = use_location().pathname;

    #[cfg(feature = "hydrate")]
    super::browser::start(set_snapshot, lifecycle, pathname);
    #[cfg(not(feature = "hydrate"))]
    let _ = set_snapshot;

    Effect::new(move || {
        let path = pathname.get();
        if let Some(lifecycle) = lifecycle.get_untracked() {
            spawn_local(async move {
                lifecycle.on_navigation(&path).await;
            });
        }
    });

    children()
}
