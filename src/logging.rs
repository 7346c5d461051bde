//! Tracing bootstrap for the embedding application.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// Respects `RUST_LOG` when set and defaults to `info` otherwise. Call once
/// at application startup, before constructing any store.
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
