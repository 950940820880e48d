//! Durable store: a JSON object of string values persisted under the XDG state dir.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::ApiError;

type Entries = BTreeMap<String, String>;

/// File-backed store. Every write rewrites the whole file; the data set is a
/// handful of keys so this stays cheap.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Default path: `~/.local/state/meditrack/storage.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("meditrack")?;
        Ok(xdg_dirs.place_state_file("storage.json")?)
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::at(Self::default_path()?))
    }

    /// Store at a specific path. Parent directories are created on first write.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, ApiError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(ApiError::Storage(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        match serde_json::from_slice::<Entries>(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // A corrupted file must not wedge the client; start over.
                tracing::warn!(path = %self.path.display(), "discarding unreadable storage file: {}", e);
                Ok(Entries::new())
            }
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::Storage(format!("create dir {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ApiError::Storage(format!("serialize storage: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", self.path.display())))
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut Entries) -> R) -> Result<R, ApiError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Storage("file store lock poisoned".to_string()))?;
        let mut entries = self.load()?;
        let out = f(&mut entries);
        self.save(&entries)?;
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Storage("file store lock poisoned".to_string()))?;
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
