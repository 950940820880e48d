//! The two storage tiers as the rest of the client sees them.

use anyhow::Result;
use std::sync::Arc;

use super::{normalize_stored, FileStore, KeyValueStore, MemoryStore};
use crate::error::ApiError;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-serialized current user.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Durable + session storage. Cheap to clone; both the HTTP layer and the session
/// manager hold one.
#[derive(Clone)]
pub struct ClientStorage {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ClientStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStorage").finish_non_exhaustive()
    }
}

impl ClientStorage {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// File-backed durable tier at the default XDG path, in-memory session tier.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(
            Arc::new(FileStore::open_default()?),
            Arc::new(MemoryStore::new()),
        ))
    }

    /// Both tiers in memory (tests, one-shot tools).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Read a durable value, mapping placeholder literals to None.
    pub fn read(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(normalize_stored(self.durable.get(key)?))
    }

    pub fn write(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.durable.set(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.durable.remove(key)
    }

    /// Token from the durable tier, else the session tier. Read failures count as "no token".
    pub fn token(&self) -> Option<String> {
        [&self.durable, &self.session].into_iter().find_map(|tier| {
            match tier.get(TOKEN_KEY) {
                Ok(v) => normalize_stored(v).filter(|t| !t.trim().is_empty()),
                Err(e) => {
                    tracing::warn!("token lookup failed: {}", e);
                    None
                }
            }
        })
    }

    /// Put the token in the session tier only (not persisted across restarts).
    pub fn set_session_token(&self, token: &str) -> Result<(), ApiError> {
        self.session.set(TOKEN_KEY, token)
    }

    /// Remove the token from both tiers. Never fails; problems are logged.
    pub fn clear_tokens(&self) {
        for tier in [&self.durable, &self.session] {
            if let Err(e) = tier.remove(TOKEN_KEY) {
                tracing::warn!("could not clear stored token: {}", e);
            }
        }
    }

    /// Remove token and current user. Never fails; problems are logged.
    pub fn clear_session(&self) {
        self.clear_tokens();
        if let Err(e) = self.durable.remove(CURRENT_USER_KEY) {
            tracing::warn!("could not clear stored user: {}", e);
        }
    }
}
