//! Session persistence.
//!
//! The signed-in profile is stored as JSON under a single key in a
//! pluggable key-value store, the shape of a browser's local storage.
//! Quota failures are surfaced to the caller as a distinct error so
//! the UI can warn; they are never fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::UserProfile;

const SESSION_KEY: &str = "corkboard.session";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value persistence surface.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// Persist the profile. A quota failure is returned for the caller to
/// toast; the in-memory session stays valid either way.
pub fn save_session<S: SessionStore>(
    store: &mut S,
    profile: &UserProfile,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(profile)
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    store.set(SESSION_KEY, &json)
}

/// Restore the profile saved by a previous run. Corrupt or absent data
/// reads as no session.
pub fn load_session<S: SessionStore>(store: &S) -> Option<UserProfile> {
    let json = store.get(SESSION_KEY)?;
    serde_json::from_str(&json).ok()
}

pub fn clear_session<S: SessionStore>(store: &mut S) {
    store.remove(SESSION_KEY);
}

/// In-memory store, used in tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Store backed by one JSON file per key under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| {
            // ENOSPC maps to the quota error the UI warns about
            if e.raw_os_error() == Some(28) {
                StorageError::QuotaExceeded
            } else {
                StorageError::Unavailable(e.to_string())
            }
        })
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }
}
