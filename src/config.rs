//! Application configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file (`GROCERY_BUDDY_CONFIG` or `grocery-buddy.toml`),
//! and environment variables (a `.env` file is honored via `dotenvy`).

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{Error, Result};

const AUTH_BACKEND_VAR: &str = "GROCERY_BUDDY_AUTH_BACKEND";
const API_BASE_URL_VAR: &str = "GROCERY_BUDDY_API_BASE_URL";
const STORAGE_PATH_VAR: &str = "GROCERY_BUDDY_STORAGE_PATH";
const CONFIG_PATH_VAR: &str = "GROCERY_BUDDY_CONFIG";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_STORAGE_PATH: &str = "data/grocery_buddy.json";
const DEFAULT_CONFIG_PATH: &str = "grocery-buddy.toml";

/// Which identity backend the auth store talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthBackend {
    /// Local mock provider persisting users in the key-value store
    #[default]
    Mock,
    /// External HTTP identity provider
    Remote,
}

impl FromStr for AuthBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mock" => Ok(Self::Mock),
            "remote" => Ok(Self::Remote),
            other => Err(Error::Config {
                message: format!("Unknown auth backend: {other} (expected \"mock\" or \"remote\")"),
            }),
        }
    }
}

/// Resolved application configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Identity backend selected at construction time
    pub auth_backend: AuthBackend,
    /// Base URL of the HTTP API
    pub api_base_url: String,
    /// Path of the file-backed key-value document
    pub storage_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_backend: AuthBackend::Mock,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

/// Optional values as they appear in the TOML file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    auth_backend: Option<String>,
    api_base_url: Option<String>,
    storage_path: Option<PathBuf>,
}

impl AppConfig {
    /// Builds the configuration from environment variables alone.
    ///
    /// # Errors
    /// Returns `Error::Config` when `GROCERY_BUDDY_AUTH_BACKEND` holds an
    /// unknown backend name.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::default().overlay_env()
    }

    /// Builds the configuration from the optional TOML file plus the
    /// environment, with environment variables taking precedence.
    ///
    /// # Errors
    /// Returns `Error::Config` for an unreadable or malformed config file or
    /// an unknown backend name.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let path = env::var(CONFIG_PATH_VAR)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

        let mut config = Self::default();
        if path.exists() {
            config = config.overlay_file(&path)?;
            info!(path = %path.display(), "Loaded configuration file");
        } else if env::var(CONFIG_PATH_VAR).is_ok() {
            warn!(path = %path.display(), "Configured config file does not exist, using defaults");
        }
        config.overlay_env()
    }

    fn overlay_file(mut self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&raw).map_err(|e| Error::Config {
            message: format!("Invalid config file {}: {e}", path.display()),
        })?;
        if let Some(backend) = file.auth_backend {
            self.auth_backend = backend.parse()?;
        }
        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(storage) = file.storage_path {
            self.storage_path = storage;
        }
        Ok(self)
    }

    fn overlay_env(mut self) -> Result<Self> {
        if let Ok(backend) = env::var(AUTH_BACKEND_VAR) {
            self.auth_backend = backend.parse()?;
        }
        if let Ok(url) = env::var(API_BASE_URL_VAR) {
            self.api_base_url = url;
        }
        if let Ok(storage) = env::var(STORAGE_PATH_VAR) {
            self.storage_path = PathBuf::from(storage);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.auth_backend, AuthBackend::Mock);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("mock".parse::<AuthBackend>().unwrap(), AuthBackend::Mock);
        assert_eq!("remote".parse::<AuthBackend>().unwrap(), AuthBackend::Remote);
        assert!("firebase".parse::<AuthBackend>().is_err());
    }

    #[test]
    fn test_file_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocery-buddy.toml");
        std::fs::write(
            &path,
            "auth_backend = \"remote\"\napi_base_url = \"http://api.test\"\n",
        )
        .unwrap();

        let config = AppConfig::default().overlay_file(&path).unwrap();
        assert_eq!(config.auth_backend, AuthBackend::Remote);
        assert_eq!(config.api_base_url, "http://api.test");
        // Unset file keys keep their defaults
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocery-buddy.toml");
        std::fs::write(&path, "auth_backend = [1,").unwrap();

        let result = AppConfig::default().overlay_file(&path);
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
