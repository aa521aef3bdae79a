//! Session and route-authorization core for compliance-console.
//!
//! This crate provides:
//! - Token handling (`AccessToken`, `RefreshToken`, `TokenPair`) and the
//!   unverified claims codec (`codec::decode`)
//! - Durable token storage behind the `TokenStore` trait
//! - Identity hydration (`SessionHydrator`) and proactive token renewal
//!   (`RefreshMonitor`)
//! - Route classification plus the two authorization layers: the edge
//!   filter decision (`edge`) and the in-app role guard decision (`guard`)
//! - The per-tab `SessionContext` and the `SessionLifecycle` that wires
//!   everything together
//!
//! # Trust Model
//!
//! Tokens are decoded locally without signature verification. Only the
//! `exp` claim is trusted; the role and profile always come from the
//! identity service.
//!
//! # Example
//!
//! ```
//! use compliance_console_session::{
//!     route::{self, RouteClass},
//!     edge::{self, EdgeDecision},
//! };
//!
//! assert_eq!(route::classify("/admin/users"), RouteClass::AdminOnly);
//!
//! let decision = edge::evaluate("/assets", None);
//! assert_eq!(
//!     decision,
//!     EdgeDecision::RedirectToLogin {
//!         location: "/login?from=%2Fassets".to_string()
//!     }
//! );
//! ```

pub mod clock;
pub mod codec;
pub mod context;
pub mod edge;
pub mod error;
pub mod guard;
pub mod hydrator;
pub mod lifecycle;
pub mod monitor;
pub mod role;
pub mod route;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::Claims;
pub use context::{SessionContext, SessionSnapshot, SessionStatus};
pub use edge::EdgeDecision;
pub use error::{IdentityError, MalformedTokenError, SessionError};
pub use guard::GuardDecision;
pub use hydrator::SessionHydrator;
pub use lifecycle::SessionLifecycle;
pub use monitor::{CheckOutcome, MonitorState, RefreshMonitor, RefreshPolicy};
pub use role::Role;
pub use route::RouteClass;
pub use service::{IdentityService, LoginCredentials, Navigator};
pub use session::Session;
pub use store::{MemoryTokenStore, TokenStore};
pub use token::{AccessToken, RefreshToken, TokenPair};
