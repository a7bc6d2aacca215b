//! services/app/src/adapters/store.rs
//!
//! Implementations of the `KeyValueStore` port: a JSON file that survives restarts,
//! and an in-memory map for throwaway sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use storyteller_core::ports::{KeyValueStore, PortError, PortResult};
use tokio::sync::Mutex;
use tracing::debug;

//=========================================================================================
// JSON File Store
//=========================================================================================

/// Keeps every slot in one JSON object on disk.
///
/// Writes go to a sibling temp file that is renamed over the original, so a
/// crash never leaves a half-written store behind.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> PortResult<HashMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PortError::Storage(format!("Corrupt store {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }

    async fn write_all(&self, slots: &HashMap<String, String>) -> PortResult<()> {
        let bytes = serde_json::to_vec_pretty(slots).map_err(|e| PortError::Storage(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Storage(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        let mut slots = self.read_all().await?;
        slots.insert(key.to_string(), value.to_string());
        debug!(key, path = %self.path.display(), "Writing slot");
        self.write_all(&slots).await
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        let mut slots = self.read_all().await?;
        if slots.remove(key).is_none() {
            return Ok(());
        }
        debug!(key, path = %self.path.display(), "Removing slot");
        self.write_all(&slots).await
    }
}

//=========================================================================================
// In-Memory Store
//=========================================================================================

#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.slots.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.slots
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.slots.lock().await.remove(key);
        Ok(())
    }
}
