//! Persisted bearer token and cached profile.
//!
//! Both entries are caches of server truth. Expiry is never tracked locally;
//! the server rejecting a request is the only signal.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::Profile;

pub const TOKEN_KEY: &str = "auth_token";
pub const PROFILE_KEY: &str = "user_data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential file error: {0}")]
    Io(#[from] io::Error),

    #[error("credential encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;

    /// Persist `token`, replacing any previous value.
    fn set(&self, token: &str) -> Result<(), StoreError>;

    fn cached_profile(&self) -> Option<Profile>;

    fn set_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Remove the token and the cached profile. Idempotent and infallible.
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.get().is_none() && self.cached_profile().is_none()
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Entries {
    token: Option<String>,
    profile: Option<Profile>,
}

/// Store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Entries>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.lock().token = Some(token.into());
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.inner.lock().token.clone()
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.inner.lock().token = Some(token.to_string());
        Ok(())
    }

    fn cached_profile(&self) -> Option<Profile> {
        self.inner.lock().profile.clone()
    }

    fn set_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.inner.lock().profile = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) {
        let mut entries = self.inner.lock();
        entries.token = None;
        entries.profile = None;
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// JSON key-value file holding `auth_token` and `user_data`.
///
/// A missing or unreadable file reads as empty. Writes go through a
/// temporary sibling file and a rename.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, Value> {
        let contents: String = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("Could not read credentials at {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Ignoring corrupt credentials file {}: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json: String = serde_json::to_string_pretty(entries)?;
        let tmp: PathBuf = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Credentials written to {}", self.path.display());
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, Value>) -> Result<(), StoreError>,
    {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries();
        f(&mut entries)?;
        self.write_entries(&entries)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.lock();
        self.read_entries()
            .remove(TOKEN_KEY)
            .and_then(|v| v.as_str().map(str::to_owned))
            .filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
            Ok(())
        })
    }

    fn cached_profile(&self) -> Option<Profile> {
        let _guard = self.lock.lock();
        let raw: Value = self.read_entries().remove(PROFILE_KEY)?;
        match serde_json::from_value(raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Ignoring unreadable cached profile: {}", e);
                None
            }
        }
    }

    fn set_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let value: Value = serde_json::to_value(profile)?;
        self.update(|entries| {
            entries.insert(PROFILE_KEY.to_string(), value);
            Ok(())
        })
    }

    fn clear(&self) {
        let result = self.update(|entries| {
            entries.remove(TOKEN_KEY);
            entries.remove(PROFILE_KEY);
            Ok(())
        });

        if let Err(e) = result {
            warn!(
                "Failed to clear credentials at {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
