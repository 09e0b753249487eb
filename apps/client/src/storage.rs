//! File-backed key/value store holding the client's persisted state.
//!
//! Values are JSON documents stored under a fixed set of keys in a single
//! file. Every write rewrites the file through a temporary sibling and a rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    UserProfile,
    SavedJobs,
    SessionId,
    UserEmail,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::UserProfile => "userProfile",
            StoreKey::SavedJobs => "savedJobs",
            StoreKey::SessionId => "sessionId",
            StoreKey::UserEmail => "userEmail",
        }
    }
}

/// Cheap to clone; clones share the same file and in-memory map.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: Arc<PathBuf>,
    entries: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl LocalStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable document is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(raw) => serde_json::from_slice(&raw).unwrap_or_else(|e| {
                warn!("Discarding corrupt store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path: Arc::new(path),
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` for a missing key or a value that no longer decodes as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let Some(value) = entries.get(key.as_str()) else {
            return Ok(None);
        };
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                warn!("Ignoring unreadable '{}' entry: {}", key.as_str(), e);
                Ok(None)
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.as_str(),
            source,
        })?;
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.as_str().to_string(), value);
        self.flush(&entries)
    }

    pub fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if entries.remove(key.as_str()).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.to_path_buf(),
            source,
        };
        let raw = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Encode {
            key: "*",
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw).map_err(io_err)?;
        std::fs::rename(&tmp, self.path.as_ref()).map_err(io_err)
    }
}
