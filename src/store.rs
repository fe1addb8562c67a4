//! Scoped key/value persistence behind the stores.
//!
//! The prototype kept everything in browser storage; here the same two
//! records live behind [`KvStore`] so the session store and the application
//! repository never care what is underneath. [`MemoryStore`] is the
//! ephemeral backend used in tests, [`JsonFileStore`] keeps a single JSON
//! object file on disk. A value that cannot be read back is reported as
//! absent, never as an error.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::warn;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: &str, value: String);
    async fn delete(&self, key: &str);
}

pub type SharedStore = Arc<dyn KvStore>;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    async fn put(&self, key: &str, value: String) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Durable backend: one JSON object file mapping keys to raw string values.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes load-modify-save so a write never observes a half-applied
    // sibling write.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                warn!("failed to read store file {}: {err}", self.path.display());
                return HashMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "discarding corrupt store file {}: {err}",
                    self.path.display()
                );
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) {
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("failed to serialize store contents: {err}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!("failed to write store file {}: {err}", self.path.display());
        }
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap();
        self.load().get(key).cloned()
    }

    async fn put(&self, key: &str, value: String) {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load();
        entries.insert(key.to_string(), value);
        self.save(&entries);
    }

    async fn delete(&self, key: &str) {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();

        assert_eq!(store.get("missing").await, None);

        store.put("greeting", "hello".to_string()).await;
        assert_eq!(store.get("greeting").await, Some("hello".to_string()));

        store.put("greeting", "hi".to_string()).await;
        assert_eq!(store.get("greeting").await, Some("hi".to_string()));

        store.delete("greeting").await;
        assert_eq!(store.get("greeting").await, None);

        // Deleting an absent key is a no-op.
        store.delete("greeting").await;
    }

    #[tokio::test]
    async fn file_store_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!("ansxtra_store_reopen_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("store.json");

        let store = JsonFileStore::new(path.clone());
        store.put("ansxtra_current_user", "{\"email\":\"x\"}".to_string()).await;
        drop(store);

        let reopened = JsonFileStore::new(path);
        assert_eq!(
            reopened.get("ansxtra_current_user").await,
            Some("{\"email\":\"x\"}".to_string())
        );
        reopened.delete("ansxtra_current_user").await;
        assert_eq!(reopened.get("ansxtra_current_user").await, None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn file_store_treats_corrupt_file_as_empty() {
        let dir = std::env::temp_dir().join(format!("ansxtra_store_corrupt_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.json");
        std::fs::write(&path, "this is not json").unwrap();

        let store = JsonFileStore::new(path);
        assert_eq!(store.get("anything").await, None);

        // Writing through the corrupt file replaces it with a clean one.
        store.put("key", "value".to_string()).await;
        assert_eq!(store.get("key").await, Some("value".to_string()));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
