//! Client-side key/value storage.
//!
//! Mirrors the two places a browser client keeps credentials: a durable tier that
//! survives restarts (a JSON file under the XDG state dir) and a session tier that
//! lives as long as the process. Values written by older, buggy clients may be the
//! literal strings `"undefined"` or `"null"`; readers treat those as absent.

mod client;
mod file;
mod memory;

pub use client::{ClientStorage, CURRENT_USER_KEY, TOKEN_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::ApiError;

/// Minimal string key/value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// Returns None for values that mean "nothing stored".
pub fn normalize_stored(value: Option<String>) -> Option<String> {
    let value = value?;
    match value.trim() {
        "" | "undefined" | "null" => None,
        _ => Some(value),
    }
}
