//! Remote identity provider.
//!
//! Delegates credential operations to the HTTP identity API. Session
//! tokens live in secure storage; the session user snapshot is cached
//! under its own key so `current_user` works offline. Extended profile
//! fields (first/last name) come from a per-user profile document fetched
//! after sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::{ApiClient, LoginRequest, ProfileDocument, RegisterRequest, SessionResponse};
use crate::auth::{AuthListener, AuthProvider, AuthSubscription, ListenerSet};
use crate::entities::{NewProfile, ProfileUpdate, User};
use crate::errors::{Error, Result};
use crate::storage::{keys, Storage};

/// HTTP-backed [`AuthProvider`].
pub struct RemoteAuthProvider {
    api: ApiClient,
    secure: Arc<dyn Storage>,
    listeners: Arc<ListenerSet>,
}

impl RemoteAuthProvider {
    /// Creates a provider over the given API client and secure token store.
    #[must_use]
    pub fn new(api: ApiClient, secure: Arc<dyn Storage>) -> Self {
        Self {
            api,
            secure,
            listeners: ListenerSet::new(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        self.secure
            .get(keys::ACCESS_TOKEN)
            .await?
            .ok_or(Error::NotAuthenticated)
    }

    async fn store_session(&self, session: &SessionResponse) -> Result<()> {
        self.secure
            .set(keys::ACCESS_TOKEN, &session.access_token)
            .await?;
        self.secure
            .set(keys::REFRESH_TOKEN, &session.refresh_token)
            .await?;
        self.store_user(&session.user).await
    }

    async fn store_user(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.secure.set(keys::USER_DATA, &raw).await
    }

    async fn clear_session(&self) -> Result<()> {
        self.secure.remove(keys::ACCESS_TOKEN).await?;
        self.secure.remove(keys::REFRESH_TOKEN).await?;
        self.secure.remove(keys::USER_DATA).await
    }

    /// Merges the remote profile document into the session user.
    async fn enrich_from_profile(&self, mut user: User, token: &str) -> User {
        match self.api.get_profile(token).await {
            Ok(profile) => {
                if profile.display_name.is_some() {
                    user.display_name = profile.display_name;
                }
                if profile.first_name.is_some() {
                    user.first_name = profile.first_name;
                }
                if profile.last_name.is_some() {
                    user.last_name = profile.last_name;
                }
                if profile.subscription.is_some() {
                    user.subscription = profile.subscription;
                }
            }
            Err(e) => warn!(error = %e, "Failed to fetch profile document"),
        }
        user
    }
}

#[async_trait]
impl AuthProvider for RemoteAuthProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        profile: NewProfile,
    ) -> Result<User> {
        let session = self
            .api
            .register(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                display_name: profile.display_name.clone(),
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
            })
            .await?;

        // First/last name live in the profile document, not the account
        if profile.first_name.is_some() || profile.last_name.is_some() {
            let document = ProfileDocument {
                display_name: profile.display_name,
                first_name: profile.first_name,
                last_name: profile.last_name,
                subscription: None,
            };
            if let Err(e) = self
                .api
                .update_profile(&session.access_token, &document)
                .await
            {
                warn!(error = %e, "Failed to persist profile document for new account");
            }
        }

        let user = self
            .enrich_from_profile(session.user.clone(), &session.access_token)
            .await;
        self.store_session(&SessionResponse {
            user: user.clone(),
            ..session
        })
        .await?;
        info!(uid = %user.uid, "Registered remote account");
        self.listeners.notify(Some(&user));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let session = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let user = self
            .enrich_from_profile(session.user.clone(), &session.access_token)
            .await;
        self.store_session(&SessionResponse {
            user: user.clone(),
            ..session
        })
        .await?;
        info!(uid = %user.uid, "Remote sign-in");
        self.listeners.notify(Some(&user));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        // Best effort: the local session is cleared even if the server
        // call fails
        if let Ok(token) = self.access_token().await {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }
        self.clear_session().await?;
        self.listeners.notify(None);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>> {
        match self.secure.get(keys::USER_DATA).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    warn!(error = %e, "Corrupted session snapshot, treating as signed out");
                    self.secure.remove(keys::USER_DATA).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<User> {
        let token = self.access_token().await?;
        let mut user = self
            .current_user()
            .await?
            .filter(|u| u.uid == uid)
            .ok_or(Error::NotAuthenticated)?;

        let document = ProfileDocument {
            display_name: update.display_name.or_else(|| user.display_name.clone()),
            first_name: update.first_name.or_else(|| user.first_name.clone()),
            last_name: update.last_name.or_else(|| user.last_name.clone()),
            subscription: update.subscription.or_else(|| user.subscription.clone()),
        };
        let saved = self.api.update_profile(&token, &document).await?;

        user.display_name = saved.display_name;
        user.first_name = saved.first_name;
        user.last_name = saved.last_name;
        user.subscription = saved.subscription;
        if let Some(role) = update.role {
            user.role = Some(role);
        }
        self.store_user(&user).await?;
        self.listeners.notify(Some(&user));
        Ok(user)
    }

    async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        self.api.forgot_password(email).await?;
        // The token is delivered out of band (email), never returned
        Ok(None)
    }

    async fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        self.api.reset_password(email, new_password).await?;
        Ok(())
    }

    fn subscribe(&self, listener: AuthListener) -> AuthSubscription {
        self.listeners.subscribe(listener)
    }
}
