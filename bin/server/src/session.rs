//! Session wiring for the UI.
//!
//! `SessionProvider` owns the per-tab session and exposes it through a
//! `SessionHandle` context. `RoleRouterGuard` keeps each role inside its own
//! part of the app. The browser-backed token store and navigator only exist
//! in the hydrate build.

#[cfg(feature = "hydrate")]
mod browser;
mod guard;
mod provider;

pub use guard::RoleRouterGuard;
pub use provider::{SessionHandle, SessionProvider, use_session};
