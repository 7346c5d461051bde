//! Crate-wide error and result types.
//!
//! Domain failures carry the exact message the UI layer shows, so a
//! `to_string()` on the error is already presentable. Infrastructure
//! failures (storage, serialization, HTTP) wrap their sources instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("List not found")]
    ListNotFound { id: String },

    #[error("Item not found")]
    ItemNotFound { list_id: String, item_id: String },

    #[error("An account with this email already exists.")]
    EmailTaken { email: String },

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("No account found with that email.")]
    UserNotFound { email: String },

    #[error("Invalid or expired reset request.")]
    ResetTokenMissing { email: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
