//! Key/value persistence for local mode.
//!
//! Each key holds one JSON blob. There is no versioning: a blob that no
//! longer parses is logged and treated as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::error;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{SodapopError, SodapopResult};

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> SodapopResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> SodapopResult<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> SodapopResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> SodapopResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path(key);
        let temp = self.dir.join(format!("{key}.json.tmp"));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// Process-local storage, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> SodapopResult<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|_| SodapopError::Storage("memory storage lock poisoned".into()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> SodapopResult<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| SodapopError::Storage("memory storage lock poisoned".into()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Outcome of reading a JSON blob.
#[derive(Debug)]
pub enum Stored<T> {
    Missing,
    Found(T),
    /// Present but unreadable or malformed (already logged)
    Unreadable,
}

impl<T> Stored<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Stored::Found(value) => Some(value),
            _ => None,
        }
    }
}

pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Stored<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Stored::Missing,
        Err(e) => {
            error!("Failed to read stored {key}: {e}");
            return Stored::Unreadable;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Stored::Found(value),
        Err(e) => {
            error!("Failed to parse stored {key}: {e}");
            Stored::Unreadable
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> SodapopResult<()> {
    let content =
        serde_json::to_string(value).map_err(|e| SodapopError::Serialization(e.to_string()))?;
    store.set_item(key, &content)
}
