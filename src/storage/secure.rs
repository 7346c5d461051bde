//! Secure storage with in-memory fallback.
//!
//! Wraps a primary backend that stands in for the platform secure-storage
//! facility. When the primary fails, the operation falls back to a private
//! in-memory map so tokens keep working for the life of the process.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::errors::Result;
use crate::storage::{MemoryStorage, Storage};

/// [`Storage`] for sensitive values (session tokens).
pub struct SecureStorage {
    primary: Arc<dyn Storage>,
    fallback: MemoryStorage,
}

impl SecureStorage {
    /// Wraps `primary` with an in-memory fallback.
    #[must_use]
    pub fn new(primary: Arc<dyn Storage>) -> Self {
        Self {
            primary,
            fallback: MemoryStorage::new(),
        }
    }
}

#[async_trait]
impl Storage for SecureStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.primary.get(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "Secure storage read failed, using in-memory fallback");
                self.fallback.get(key).await
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self.primary.set(key, value).await {
            Ok(()) => {
                // Keep the fallback coherent for later degraded reads
                self.fallback.set(key, value).await
            }
            Err(e) => {
                warn!(key, error = %e, "Secure storage write failed, using in-memory fallback");
                self.fallback.set(key, value).await
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let primary = self.primary.remove(key).await;
        self.fallback.remove(key).await?;
        if let Err(e) = primary {
            warn!(key, error = %e, "Secure storage remove failed, cleared in-memory fallback only");
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let primary = self.primary.clear().await;
        self.fallback.clear().await?;
        if let Err(e) = primary {
            warn!(error = %e, "Secure storage clear failed, cleared in-memory fallback only");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::{Error, Result};

    /// Backend that fails every operation.
    struct BrokenStorage;

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(broken())
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(broken())
        }
        async fn remove(&self, _key: &str) -> Result<()> {
            Err(broken())
        }
        async fn clear(&self) -> Result<()> {
            Err(broken())
        }
    }

    fn broken() -> Error {
        Error::Storage {
            message: "secure store unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delegates_to_primary_when_healthy() -> Result<()> {
        let primary = Arc::new(MemoryStorage::new());
        let secure = SecureStorage::new(Arc::clone(&primary) as Arc<dyn Storage>);

        secure.set("token", "abc").await?;
        assert_eq!(primary.get("token").await?.as_deref(), Some("abc"));
        assert_eq!(secure.get("token").await?.as_deref(), Some("abc"));
        Ok(())
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_is_broken() -> Result<()> {
        let secure = SecureStorage::new(Arc::new(BrokenStorage));

        secure.set("token", "abc").await?;
        assert_eq!(secure.get("token").await?.as_deref(), Some("abc"));

        secure.remove("token").await?;
        assert_eq!(secure.get("token").await?, None);
        Ok(())
    }
}
