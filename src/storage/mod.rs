//! Persistent key-value storage.
//!
//! The stores persist their state as JSON strings through the [`Storage`]
//! trait; which backend sits behind it is decided once at construction time
//! and injected. Serialization stays on the caller's side, so a backend
//! only ever moves opaque strings.

use async_trait::async_trait;

use crate::errors::Result;

/// Storage key constants and key builders
pub mod keys;

mod file;
mod memory;
mod secure;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use secure::SecureStorage;

/// Asynchronous key-value store with string values.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key` if present. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Removes every key.
    async fn clear(&self) -> Result<()>;
}
