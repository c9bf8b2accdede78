//! Bearer token storage.
//!
//! The client reads the token on every request and the classifier clears it
//! when the server reports an invalid session. Both only see the
//! `TokenStore` trait, so applications can back it with whatever storage
//! they already have.

use std::sync::{Arc, PoisonError, RwLock};

pub trait TokenStore: Send + Sync {
    /// The current token. Empty strings count as no token.
    fn read(&self) -> Option<String>;

    fn clear(&self);
}

/// In-memory token store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|t| !t.is_empty())
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_read_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.read(), None);
        store.set("abc");
        assert_eq!(store.read().as_deref(), Some("abc"));
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn empty_token_reads_as_absent() {
        let store = MemoryTokenStore::with_token("");
        assert_eq!(store.read(), None);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryTokenStore::with_token("t");
        let other = store.clone();
        other.clear();
        assert_eq!(store.read(), None);
    }
}
