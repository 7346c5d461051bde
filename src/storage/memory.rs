//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::Result;
use crate::storage::Storage;

/// `HashMap`-backed [`Storage`].
///
/// The default backend for tests and the fallback behind
/// [`SecureStorage`](crate::storage::SecureStorage). Contents vanish when
/// the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}
