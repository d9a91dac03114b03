//! Key-value persistence for box overrides.
//!
//! Values are stored as JSON blobs under a string key. The blob written for box
//! overrides is `{ "<print area>": { "left": .., "top": .., "width": .., "height": .. } }`
//! with plain numeric percentages.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::boxes::{AreaBox, BoxOverrides};
use crate::errors::{StorageError, StorageResult};
use crate::registry::PrintAreaKey;

pub const BOX_OVERRIDES_STORAGE_KEY: &str = "mockup-print-area-boxes";

pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// One `<key>.json` file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        fs::write(&path, value).map_err(io_error)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-process store, used by tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// Reads and writes the box-override blob as a whole (last write wins)
pub struct BoxOverrideStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BoxOverrideStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, BOX_OVERRIDES_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn persist(&self, overrides: &BoxOverrides) -> StorageResult<()> {
        let blob = serde_json::to_string_pretty(overrides)
            .map_err(|e| StorageError::Encode(self.key.clone(), e))?;
        self.store.write(&self.key, &blob)
    }

    /// Persisted overrides merged over the defaults, always with all eight keys
    pub fn load(&self) -> StorageResult<BoxOverrides> {
        let Some(blob) = self.store.read(&self.key)? else {
            debug!("No persisted box overrides under {}", self.key);
            return Ok(BoxOverrides::new().with_defaults());
        };
        let raw: HashMap<String, Value> =
            serde_json::from_str(&blob).map_err(|source| StorageError::Corrupt {
                key: self.key.clone(),
                source,
            })?;

        let mut overrides = BoxOverrides::new();
        for (name, value) in raw {
            let Ok(key) = name.parse::<PrintAreaKey>() else {
                warn!("Ignoring persisted box for unknown print area '{}'", name);
                continue;
            };
            match serde_json::from_value::<AreaBox>(value) {
                Ok(area) => overrides.insert(key, area),
                Err(e) => warn!("Ignoring malformed persisted box for {}: {}", key, e),
            }
        }
        Ok(overrides.with_defaults())
    }

    /// Like [`load`](Self::load), but an unreadable blob falls back to the defaults
    pub fn load_or_default(&self) -> BoxOverrides {
        self.load().unwrap_or_else(|e| {
            warn!("Box overrides unreadable, using defaults: {}", e);
            BoxOverrides::new().with_defaults()
        })
    }

    pub fn reset(&self) -> StorageResult<()> {
        self.store.remove(&self.key)
    }
}
