//! Durable token storage.
//!
//! The store is the single source of truth for the current credential.
//! Every write and clear bumps an epoch counter; asynchronous work tags its
//! result with the epoch it started from and drops the result if the epoch
//! has moved on.

use std::sync::{PoisonError, RwLock};

use crate::token::{AccessToken, TokenPair};

/// Storage for the access and refresh tokens.
pub trait TokenStore: Send + Sync {
    /// Returns the stored pair, or `None` if no access token is stored.
    fn get(&self) -> Option<TokenPair>;

    /// Replaces both tokens.
    fn set(&self, tokens: TokenPair);

    /// Replaces the access token, keeping the refresh token.
    fn replace_access(&self, access: AccessToken);

    /// Removes both tokens.
    fn clear(&self);

    /// Returns the current epoch.
    fn epoch(&self) -> u64;
}

#[derive(Debug, Default)]
struct Slots {
    tokens: Option<TokenPair>,
    epoch: u64,
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: RwLock<Slots>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `tokens`.
    #[must_use]
    pub fn with_tokens(tokens: TokenPair) -> Self {
        let store = Self::new();
        store.set(tokens);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<TokenPair> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tokens
            .clone()
    }

    fn set(&self, tokens: TokenPair) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.tokens = Some(tokens);
        slots.epoch += 1;
    }

    fn replace_access(&self, access: AccessToken) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let refresh = slots.tokens.take().and_then(|pair| pair.refresh);
        slots.tokens = Some(TokenPair { access, refresh });
        slots.epoch += 1;
    }

    fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.tokens = None;
        slots.epoch += 1;
    }

    fn epoch(&self) -> u64 {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::RefreshToken;

    fn pair() -> TokenPair {
        TokenPair::new(AccessToken::new("access-1"), RefreshToken::new("refresh-1"))
    }

    #[test]
    fn set_then_get_returns_same_tokens() {
        let store = MemoryTokenStore::new();
        store.set(pair());
        assert_eq!(store.get(), Some(pair()));
    }

    #[test]
    fn clear_removes_both_entries() {
        let store = MemoryTokenStore::with_tokens(pair());
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn replace_access_keeps_refresh_token() {
        let store = MemoryTokenStore::with_tokens(pair());
        store.replace_access(AccessToken::new("access-2"));

        let tokens = store.get().expect("tokens");
        assert_eq!(tokens.access.as_str(), "access-2");
        assert_eq!(tokens.refresh, Some(RefreshToken::new("refresh-1")));
    }

    #[test]
    fn every_write_bumps_epoch() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.epoch(), 0);
        store.set(pair());
        assert_eq!(store.epoch(), 1);
        store.replace_access(AccessToken::new("access-2"));
        assert_eq!(store.epoch(), 2);
        store.clear();
        assert_eq!(store.epoch(), 3);
    }

    #[test]
    fn reads_do_not_bump_epoch() {
        let store = MemoryTokenStore::with_tokens(pair());
        let before = store.epoch();
        let _ = store.get();
        assert_eq!(store.epoch(), before);
    }
}
