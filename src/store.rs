//! Key-value persistence surface.
//!
//! The engine only ever needs string get/set/remove scoped to the hosting
//! page, so the trait stays deliberately small. `MemoryStore` matches a
//! session-scoped store; `FileStore` survives "reloads" by writing the whole
//! map to a JSON file on every change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Well-known storage keys.
pub mod keys {
    /// Persisted presentation-mode preference.
    pub const MODE_PREFERENCE: &str = "mode";
    /// Persisted visitor identifier.
    pub const VISITOR_ID: &str = "visitor_id";
    /// Rolling analytics event log.
    pub const EVENT_LOG: &str = "events";
    /// First-touch attribution fields.
    pub const FIRST_SOURCE: &str = "first_source";
    pub const FIRST_MEDIUM: &str = "first_medium";
    pub const FIRST_CAMPAIGN: &str = "first_campaign";

    /// Per-tool survey answer set.
    pub fn survey_answers(tool: &str) -> String {
        format!("survey:{tool}")
    }
}

/// Backend-agnostic key-value store.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store. State is lost when the store is dropped.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// JSON-file-backed store.
///
/// The full map is rewritten on every change; the data involved is a handful
/// of short strings, so simplicity wins over incremental writes. A corrupt
/// file is treated as recoverable: the store starts empty and logs a warning.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Corrupt store file, starting empty: {e}");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.flush(&entries)
    }
}
