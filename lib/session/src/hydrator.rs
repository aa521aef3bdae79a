//! Resolves the stored token into a session.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::SessionContext;
use crate::service::IdentityService;
use crate::session::Session;
use crate::store::TokenStore;

/// Fetches the profile for the stored access token and publishes it to
/// the [`SessionContext`].
///
/// Claims inside the token are never used for profile or role fields; the
/// identity service is the only authority. A failed fetch leaves the token
/// in place, since invalidating it is the refresh monitor's call.
pub struct SessionHydrator {
    store: Arc<dyn TokenStore>,
    identity: Arc<dyn IdentityService>,
    context: SessionContext,
}

impl SessionHydrator {
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        identity: Arc<dyn IdentityService>,
        context: SessionContext,
    ) -> Self {
        Self {
            store,
            identity,
            context,
        }
    }

    /// Resolves the current token into a session.
    ///
    /// Returns `None` when no token is stored or when the fetch fails. If the
    /// token changes while the fetch is in flight, the result is dropped and
    /// the fetch runs again for whatever the store holds now, so the context
    /// always settles.
    pub async fn hydrate(&self) -> Option<Session> {
        self.context.begin_loading();

        loop {
            let Some(tokens) = self.store.get() else {
                debug!("no stored credential, session is anonymous");
                self.context.settle(None);
                return None;
            };
            let epoch = self.store.epoch();

            let result = self.identity.fetch_profile(&tokens.access).await;
            if self.store.epoch() != epoch {
                debug!(epoch, "token changed during hydration, fetching again");
                continue;
            }

            return match result {
                Ok(session) => {
                    debug!(user_id = %session.id(), role = %session.role(), "session hydrated");
                    self.context.settle(Some(session.clone()));
                    Some(session)
                }
                Err(error) => {
                    warn!(%error, "identity fetch failed, continuing without a session");
                    self.context.fail();
                    None
                }
            };
        }
    }
}
