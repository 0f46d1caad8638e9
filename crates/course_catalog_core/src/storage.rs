//! crates/course_catalog_core/src/storage.rs
//!
//! Typed access to a `KeyValueStore`: values are kept as JSON text and read
//! back with a fallback, so a missing or unparsable slot behaves the same.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::warn;

use async_trait::async_trait;

use crate::ports::{KeyValueStore, PortError, PortResult};

/// Logical key names of the persisted collections.
pub mod keys {
    pub const COURSES: &str = "courses";
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const ENROLLMENTS: &str = "enrollments";
}

/// Serializing wrapper shared by every repository.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Reads `key`, returning `None` when it is absent or is not valid JSON.
    ///
    /// Valid JSON that does not match `T` is an error rather than `None`, so a
    /// following write can never replace records this build cannot read.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> PortResult<Option<T>> {
        let Some(raw) = self.backend.get_raw(key).await? else {
            return Ok(None);
        };
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Ignoring unparsable stored value");
                return Ok(None);
            }
        };
        serde_json::from_value(value).map(Some).map_err(|e| {
            warn!(key, error = %e, "Stored value does not match the expected shape");
            PortError::Unexpected(format!("Stored '{}' has an unexpected shape: {}", key, e))
        })
    }

    /// Reads `key`, or hands back `fallback` if it is absent or malformed.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> PortResult<T> {
        Ok(self.try_get(key).await?.unwrap_or(fallback))
    }

    /// Overwrites `key` with the JSON form of `value`.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PortResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.backend.set_raw(key, &raw).await
    }

    pub async fn remove(&self, key: &str) -> PortResult<()> {
        self.backend.remove(key).await
    }
}

//=========================================================================================
// In-Memory Backend
//=========================================================================================

/// A process-local store. Used by tests and the `memory` storage backend.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_raw(&self, key: &str) -> PortResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
