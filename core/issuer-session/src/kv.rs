//! Durable string-keyed storage for client state.
//!
//! [`FileStore`] plays the role browser local storage plays for a web client:
//! a small map of string keys to string values that survives restarts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};

/// Application directory name under the platform data dir.
pub const APP_DIR: &str = "issuer-console";

/// File name of the default store.
pub const STORE_FILE: &str = "storage.json";

/// A durable string-keyed store.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `None` if the key was never written.
    fn get(&self, key: &str) -> SessionResult<Option<String>>;

    /// Writes a value. Once this returns `Ok`, the value survives a restart.
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Removes a key; removing a missing key is not an error.
    fn remove(&self, key: &str) -> SessionResult<()>;
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object of string values kept in a single file.
///
/// Writes go to a sibling temp file that is renamed over the original, so a
/// crash mid-write leaves either the old or the new map on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens (lazily) a store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Opens the store at `<data dir>/issuer-console/storage.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no data directory.
    pub fn open_default() -> SessionResult<Self> {
        Ok(Self::new(default_path()?))
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> SessionResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Like `read_all`, but a corrupt file is replaced instead of blocking writes.
    fn read_for_update(&self) -> SessionResult<BTreeMap<String, String>> {
        match self.read_all() {
            Err(SessionError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "store written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_for_update()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Default store location under the platform data directory.
///
/// # Errors
///
/// Returns an error if the platform has no data directory.
pub fn default_path() -> SessionResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(STORE_FILE))
        .ok_or_else(|| SessionError::Storage("no platform data directory".to_string()))
}
