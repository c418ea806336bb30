//! Key-value persistence for tokens, gatekeepers and install metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

/// Key holding the serialized current access token.
pub const ACCESS_TOKEN_KEY: &str = "com.facebook.sdk.v4.FBSDKAccessTokenInformationKey";

/// Key holding the serialized current authentication token.
pub const AUTHENTICATION_TOKEN_KEY: &str = "com.facebook.sdk.v9.FBSDKAuthenticationTokenInformationKey";

/// Prefix of the per-app gatekeeper cache key; the app ID is appended.
pub const GATEKEEPERS_KEY_PREFIX: &str = "com.facebook.sdk:GateKeepers";

/// Key holding the first-launch timestamp (unix seconds).
pub const INSTALL_TIMESTAMP_KEY: &str = "com.facebook.sdk:FBSDKSettingsInstallTimestamp";

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistent key-value storage (keychain / user defaults on mobile).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

/// Store backed by a JSON file.
///
/// Entries are cached in memory and the whole map is rewritten after
/// every change.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens the store, loading existing entries from disk.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let entries = load_entries(&path)?;
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Default store location next to the settings file.
    pub fn default_path() -> Option<PathBuf> {
        crate::settings::config_dir().map(|d| d.join("playkit").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        debug!("persisted {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = std::fs::read_to_string(path)?;
    let entries: BTreeMap<String, Value> = serde_json::from_str(&data)?;
    debug!("loaded {} entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Cache key for the gatekeepers of `app_id`.
pub fn gatekeepers_key(app_id: &str) -> String {
    format!("{GATEKEEPERS_KEY_PREFIX}{app_id}")
}
