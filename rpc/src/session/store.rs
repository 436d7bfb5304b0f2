//! Persistent key/value storage for the session token, user info and selected farm

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use error_stack::{Report, ResultExt};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, warn};

use crate::constants::STORE_FILE_NAME;
use crate::error::{Error, Result};

/// Fixed keys the session persists
#[derive(Display, EnumString, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum StoreKey {
    /// Bearer token set at login
    Token,
    /// JSON-serialized `UserInfo`
    UserInfo,
    /// Identifier of the farm callers scope their filters to
    SelectedFarm,
}

/// Backing storage for session state
pub trait TokenStore: Send + Sync {
    /// Read a value; `None` when the key was never set or was removed
    ///
    /// # Errors
    /// Fails with `TokenStore` when the backing storage cannot be read.
    fn get(&self, key: StoreKey) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Fails with `TokenStore` when the backing storage cannot be written.
    fn set(&self, key: StoreKey, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key is not an error
    ///
    /// # Errors
    /// Fails with `TokenStore` when the backing storage cannot be written.
    fn remove(&self, key: StoreKey) -> Result<()>;
}

fn poisoned() -> Report<Error> {
    Report::new(Error::TokenStore("Mutex poisoned".to_string()))
}

/// In-process store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.remove(&key);
        Ok(())
    }
}

/// Store persisting all keys in one JSON document on disk
///
/// Writes go to a sibling temp file first and are renamed into place, so a crash
/// never leaves a half-written document behind.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STORE_FILE_NAME),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(Report::new(Error::store_failed("read", &self.path, e))),
        };

        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Token store at {} is corrupt: {}", self.path.display(), e);
            Report::new(Error::store_failed("parse", &self.path, e))
        })
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::store_failed("create directory", parent, e))?;
        }

        let text = serde_json::to_string_pretty(document)
            .map_err(|e| Error::store_failed("serialize", &self.path, e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, &text)
            .map_err(|e| Error::store_failed("write", &tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| Error::store_failed("replace", &self.path, e))
            .attach(format!("Temp file: {}", tmp_path.display()))?;

        debug!("Token store written to {}", self.path.display());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut document = self.read_document()?;
        apply(&mut document);
        self.write_document(&document)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut document = self.read_document()?;
        Ok(document.remove(key.as_ref()))
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        self.update(|document| {
            document.remove(key.as_ref());
        })
    }
}

/// Write `text` to a fresh file readable only by the owner on unix
fn write_private(path: &Path, text: &str) -> std::io::Result<()> {
    // A leftover temp file would keep its old mode
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        return Err(e);
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()
}
