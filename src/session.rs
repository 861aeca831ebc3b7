//! The persisted session slot.
//!
//! A single key holding the JSON-serialized user. Only the auth container
//! reads or writes it.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;

use crate::error::VaultError;
use crate::model::User;

/// Raw key-value slot for the serialized session.
pub trait SessionStore: Send + Sync {
    /// Raw slot content, `None` when nothing is stored.
    fn read(&self) -> Result<Option<String>, VaultError>;
    fn write(&self, value: &str) -> Result<(), VaultError>;
    fn clear(&self) -> Result<(), VaultError>;
}

/// Restore the persisted user.
///
/// Never fails: an unreadable or malformed slot counts as "no session".
pub fn load_user(store: &dyn SessionStore) -> Option<User> {
    let raw = match store.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persisted session");
            return None;
        }
    };

    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed persisted session");
            None
        }
    }
}

pub fn save_user(store: &dyn SessionStore, user: &User) -> Result<(), VaultError> {
    let raw = serde_json::to_string(user)?;
    store.write(&raw)
}

/// In-process slot. Contents vanish with the process.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with raw content, malformed or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<String>, VaultError> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, value: &str) -> Result<(), VaultError> {
        *self.slot.lock() = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), VaultError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Session slot backed by a JSON file.
///
/// Writes go to a temporary sibling and are renamed into place while an
/// exclusive lock is held on `<path>.lock`, so concurrent CLI invocations
/// never observe a half-written file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_err(&self, source: std::io::Error) -> VaultError {
        VaultError::Storage {
            path: self.path.clone(),
            source,
        }
    }

    fn lock(&self) -> Result<File, VaultError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.storage_err(e))?;
        }
        let lock_path = self.path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| self.storage_err(e))?;
        file.lock_exclusive().map_err(|e| self.storage_err(e))?;
        Ok(file)
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Result<Option<String>, VaultError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.storage_err(e)),
        }
    }

    fn write(&self, value: &str) -> Result<(), VaultError> {
        let lock = self.lock()?;
        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &self.path));
        let _ = lock.unlock();
        result.map_err(|e| self.storage_err(e))
    }

    fn clear(&self) -> Result<(), VaultError> {
        let lock = self.lock()?;
        let result = match fs::remove_file(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        };
        let _ = lock.unlock();
        result.map_err(|e| self.storage_err(e))
    }
}
