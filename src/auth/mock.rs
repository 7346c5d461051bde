//! Mock identity provider.
//!
//! Persists a users table and the current session in the key-value store.
//! Passwords are compared in plaintext and never leave this module: the
//! stored record type is private, and sessions are written from the public
//! [`User`] struct, which has no password field.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{AuthListener, AuthProvider, AuthSubscription, ListenerSet};
use crate::core::id::generate_id;
use crate::entities::{NewProfile, ProfileUpdate, User, UserRole};
use crate::errors::{Error, Result};
use crate::storage::{keys, Storage};

const DEFAULT_DISPLAY_NAME: &str = "New User";

/// Account record as held in the mock users table. Mock-only: a real
/// backend must never store plaintext passwords.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredUser {
    uid: String,
    email: String,
    password: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    role: Option<UserRole>,
    #[serde(default)]
    subscription: Option<String>,
    created_at: DateTime<Utc>,
}

impl StoredUser {
    fn to_user(&self) -> User {
        User {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            subscription: self.subscription.clone(),
            created_at: self.created_at,
        }
    }

    fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(display_name) = &update.display_name {
            self.display_name = Some(display_name.clone());
        }
        if let Some(first_name) = &update.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(role) = update.role {
            self.role = Some(role);
        }
        if let Some(subscription) = &update.subscription {
            self.subscription = Some(subscription.clone());
        }
    }
}

/// Storage-backed [`AuthProvider`] for local development and tests.
pub struct MockAuthProvider {
    storage: Arc<dyn Storage>,
    listeners: Arc<ListenerSet>,
}

impl MockAuthProvider {
    /// Creates a provider over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            listeners: ListenerSet::new(),
        }
    }

    async fn load_users(&self) -> Result<Vec<StoredUser>> {
        match self.storage.get(keys::MOCK_USERS).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(users) => Ok(users),
                Err(e) => {
                    // A corrupted table is unrecoverable in mock mode; wipe it
                    warn!(error = %e, "Corrupted mock users table, resetting to empty");
                    self.storage.remove(keys::MOCK_USERS).await?;
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    async fn save_users(&self, users: &[StoredUser]) -> Result<()> {
        let raw = serde_json::to_string(users)?;
        self.storage.set(keys::MOCK_USERS, &raw).await
    }

    async fn save_session(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(keys::CURRENT_SESSION, &raw).await
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        profile: NewProfile,
    ) -> Result<User> {
        let mut users = self.load_users().await?;
        if users.iter().any(|u| u.email == email) {
            return Err(Error::EmailTaken {
                email: email.to_string(),
            });
        }

        let stored = StoredUser {
            uid: generate_id(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: Some(
                profile
                    .display_name
                    .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            ),
            first_name: profile.first_name,
            last_name: profile.last_name,
            role: None,
            subscription: None,
            created_at: Utc::now(),
        };
        let user = stored.to_user();

        users.push(stored);
        self.save_users(&users).await?;
        // Sign the new account straight in
        self.save_session(&user).await?;
        info!(uid = %user.uid, "Created mock account");
        self.listeners.notify(Some(&user));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let users = self.load_users().await?;
        let stored = users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(Error::InvalidCredentials)?;

        let user = stored.to_user();
        self.save_session(&user).await?;
        info!(uid = %user.uid, "Mock sign-in");
        self.listeners.notify(Some(&user));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.storage.remove(keys::CURRENT_SESSION).await?;
        self.listeners.notify(None);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>> {
        match self.storage.get(keys::CURRENT_SESSION).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    warn!(error = %e, "Corrupted session record, treating as signed out");
                    self.storage.remove(keys::CURRENT_SESSION).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<User> {
        let mut users = self.load_users().await?;
        let Some(stored) = users.iter_mut().find(|u| u.uid == uid) else {
            return Err(Error::NotAuthenticated);
        };
        stored.apply(&update);
        let user = stored.to_user();

        self.save_users(&users).await?;
        self.save_session(&user).await?;
        self.listeners.notify(Some(&user));
        Ok(user)
    }

    async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        let users = self.load_users().await?;
        if !users.iter().any(|u| u.email == email) {
            return Err(Error::UserNotFound {
                email: email.to_string(),
            });
        }
        let token = generate_id();
        self.storage
            .set(&keys::reset_token_key(email), &token)
            .await?;
        Ok(Some(token))
    }

    async fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        let token_key = keys::reset_token_key(email);
        if self.storage.get(&token_key).await?.is_none() {
            return Err(Error::ResetTokenMissing {
                email: email.to_string(),
            });
        }

        let mut users = self.load_users().await?;
        let Some(stored) = users.iter_mut().find(|u| u.email == email) else {
            return Err(Error::UserNotFound {
                email: email.to_string(),
            });
        };
        stored.password = new_password.to_string();
        self.save_users(&users).await?;
        // One-time token: spent on use
        self.storage.remove(&token_key).await?;
        info!(email, "Mock password reset completed");
        Ok(())
    }

    fn subscribe(&self, listener: AuthListener) -> AuthSubscription {
        self.listeners.subscribe(listener)
    }
}
