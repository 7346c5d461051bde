//! Authentication/session store.
//!
//! Wraps the selected identity provider with reducer-driven state. Every
//! operation toggles the loading flag around the provider call and records
//! failures in the state's `error` field; the error is also returned so
//! callers can branch on it directly.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::auth::{AuthProvider, AuthSubscription};
use crate::entities::{NewProfile, ProfileUpdate, User};
use crate::errors::{Error, Result};
use crate::storage::{keys, Storage};
use crate::store::Reducer;

/// Auth store state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// Current session user
    pub user: Option<User>,
    /// Always `user.is_some()`
    pub is_authenticated: bool,
    /// True while a provider call is in flight
    pub is_loading: bool,
    /// Message of the most recent failure, until cleared
    pub error: Option<String>,
    /// Whether the first-run onboarding flow has been completed
    pub onboarding_completed: bool,
}

/// Auth state transitions.
#[derive(Clone, Debug)]
pub enum AuthEvent {
    /// Loading flag toggled around a provider call
    LoadingChanged(bool),
    /// Session user changed (sign-in, restore, provider push)
    UserChanged(Option<User>),
    /// Session ended
    SignedOut,
    /// Profile fields updated on the current user
    ProfileUpdated(User),
    /// An operation failed
    ErrorSet(String),
    /// The UI acknowledged the error
    ErrorCleared,
    /// Onboarding completion flag loaded or set
    OnboardingCompleted(bool),
}

/// Pure reducer for [`AuthState`].
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Event = AuthEvent;

    fn reduce(mut state: Self::State, event: Self::Event) -> Self::State {
        match event {
            AuthEvent::LoadingChanged(is_loading) => state.is_loading = is_loading,
            AuthEvent::UserChanged(user) => {
                state.is_authenticated = user.is_some();
                state.user = user;
                state.error = None;
            }
            AuthEvent::SignedOut => {
                state.user = None;
                state.is_authenticated = false;
                state.error = None;
            }
            AuthEvent::ProfileUpdated(user) => {
                state.is_authenticated = true;
                state.user = Some(user);
            }
            AuthEvent::ErrorSet(message) => {
                state.error = Some(message);
                state.is_loading = false;
            }
            AuthEvent::ErrorCleared => state.error = None,
            AuthEvent::OnboardingCompleted(done) => state.onboarding_completed = done,
        }
        state
    }
}

/// Owns the session state and sequences provider and storage I/O.
pub struct AuthStore {
    state: RwLock<AuthState>,
    provider: Arc<dyn AuthProvider>,
    storage: Arc<dyn Storage>,
}

impl AuthStore {
    /// Creates a store over the given provider and storage backend.
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, storage: Arc<dyn Storage>) -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            provider,
            storage,
        }
    }

    fn apply(&self, event: AuthEvent) {
        let mut state = self.state.write();
        *state = AuthReducer::reduce(state.clone(), event);
    }

    /// Restores the session and onboarding flag from the provider/storage.
    pub async fn load(&self) {
        self.apply(AuthEvent::LoadingChanged(true));

        let onboarded = match self.storage.get(keys::ONBOARDING_COMPLETED).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Failed to read onboarding flag");
                false
            }
        };
        self.apply(AuthEvent::OnboardingCompleted(onboarded));

        match self.provider.current_user().await {
            Ok(user) => self.apply(AuthEvent::UserChanged(user)),
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                self.apply(AuthEvent::UserChanged(None));
            }
        }

        self.apply(AuthEvent::LoadingChanged(false));
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    /// `Error::EmailTaken` for a duplicate email (mock mode), or the
    /// provider/transport failure. The message is also recorded in
    /// `state.error`.
    pub async fn sign_up(&self, email: &str, password: &str, profile: NewProfile) -> Result<User> {
        self.apply(AuthEvent::LoadingChanged(true));
        let result = self.provider.create_account(email, password, profile).await;
        match &result {
            Ok(user) => self.apply(AuthEvent::UserChanged(Some(user.clone()))),
            Err(e) => self.apply(AuthEvent::ErrorSet(e.to_string())),
        }
        self.apply(AuthEvent::LoadingChanged(false));
        result
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    /// `Error::InvalidCredentials` on a mismatch (mock mode), or the
    /// provider/transport failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        self.apply(AuthEvent::LoadingChanged(true));
        let result = self.provider.sign_in(email, password).await;
        match &result {
            Ok(user) => self.apply(AuthEvent::UserChanged(Some(user.clone()))),
            Err(e) => self.apply(AuthEvent::ErrorSet(e.to_string())),
        }
        self.apply(AuthEvent::LoadingChanged(false));
        result
    }

    /// Ends the current session.
    ///
    /// # Errors
    /// Propagates the provider failure; local state is only cleared on
    /// success.
    pub async fn sign_out(&self) -> Result<()> {
        self.apply(AuthEvent::LoadingChanged(true));
        let result = self.provider.sign_out().await;
        match &result {
            Ok(()) => self.apply(AuthEvent::SignedOut),
            Err(e) => self.apply(AuthEvent::ErrorSet(e.to_string())),
        }
        self.apply(AuthEvent::LoadingChanged(false));
        result
    }

    /// Begins a password reset for `email`.
    ///
    /// # Errors
    /// `Error::UserNotFound` for an unknown account (mock mode), or the
    /// provider failure.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        self.apply(AuthEvent::LoadingChanged(true));
        let result = self.provider.forgot_password(email).await;
        if let Err(e) = &result {
            self.apply(AuthEvent::ErrorSet(e.to_string()));
        }
        self.apply(AuthEvent::LoadingChanged(false));
        result
    }

    /// Completes a password reset started by [`Self::forgot_password`].
    ///
    /// # Errors
    /// `Error::ResetTokenMissing` without a prior forgot-password call
    /// (mock mode), or the provider failure.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        self.apply(AuthEvent::LoadingChanged(true));
        let result = self.provider.reset_password(email, new_password).await;
        if let Err(e) = &result {
            self.apply(AuthEvent::ErrorSet(e.to_string()));
        }
        self.apply(AuthEvent::LoadingChanged(false));
        result
    }

    /// Applies a profile update to the current user.
    ///
    /// # Errors
    /// `Error::NotAuthenticated` without a session, or the provider
    /// failure.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let Some(uid) = self.state.read().user.as_ref().map(|u| u.uid.clone()) else {
            return Err(Error::NotAuthenticated);
        };

        self.apply(AuthEvent::LoadingChanged(true));
        let result = self.provider.update_profile(&uid, update).await;
        match &result {
            Ok(user) => self.apply(AuthEvent::ProfileUpdated(user.clone())),
            Err(e) => self.apply(AuthEvent::ErrorSet(e.to_string())),
        }
        self.apply(AuthEvent::LoadingChanged(false));
        result
    }

    /// Marks the first-run onboarding flow as completed and persists the
    /// flag.
    ///
    /// # Errors
    /// Returns the storage error when the flag cannot be written.
    pub async fn complete_onboarding(&self) -> Result<()> {
        self.storage.set(keys::ONBOARDING_COMPLETED, "true").await?;
        self.apply(AuthEvent::OnboardingCompleted(true));
        Ok(())
    }

    /// Clears the recorded error message.
    pub fn clear_error(&self) {
        self.apply(AuthEvent::ErrorCleared);
    }

    /// Wires provider session pushes into this store's state.
    ///
    /// Keep the returned subscription alive for as long as the store should
    /// follow the provider.
    #[must_use]
    pub fn subscribe_provider(self: &Arc<Self>) -> AuthSubscription {
        let store = Arc::downgrade(self);
        self.provider.subscribe(Box::new(move |user| {
            if let Some(store) = store.upgrade() {
                store.apply(AuthEvent::UserChanged(user));
            }
        }))
    }

    /// Snapshot of the session user.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    /// Whether onboarding has been completed.
    #[must_use]
    pub fn onboarding_completed(&self) -> bool {
        self.state.read().onboarding_completed
    }

    /// Presentable name of the session user, `"Guest"` when signed out.
    #[must_use]
    pub fn user_full_name(&self) -> String {
        self.state
            .read()
            .user
            .as_ref()
            .map_or_else(|| "Guest".to_string(), User::full_name)
    }

    /// Whether the session user is on a premium plan.
    #[must_use]
    pub fn is_premium_user(&self) -> bool {
        self.state.read().user.as_ref().is_some_and(User::is_premium)
    }

    /// Snapshot of the full state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::entities::UserRole;
    use crate::errors::Result;
    use crate::test_utils::{setup_stores, signed_in_stores, TEST_EMAIL, TEST_PASSWORD};

    #[tokio::test]
    async fn test_sign_up_authenticates() -> Result<()> {
        let (auth, _) = setup_stores();
        let user = auth
            .sign_up(TEST_EMAIL, TEST_PASSWORD, NewProfile::default())
            .await?;
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user(), Some(user));
        assert!(auth.state().error.is_none());
        assert!(!auth.state().is_loading);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_records_error() -> Result<()> {
        let (auth, _) = signed_in_stores().await;
        auth.sign_out().await?;

        let result = auth
            .sign_up(TEST_EMAIL, "Other1pw!", NewProfile::default())
            .await;
        assert!(result.is_err());
        assert_eq!(
            auth.state().error.as_deref(),
            Some("An account with this email already exists.")
        );
        assert!(!auth.is_authenticated());

        auth.clear_error();
        assert!(auth.state().error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_password_records_error() -> Result<()> {
        let (auth, _) = signed_in_stores().await;
        auth.sign_out().await?;

        let result = auth.sign_in(TEST_EMAIL, "wrong").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert_eq!(
            auth.state().error.as_deref(),
            Some("Invalid email or password.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_session_survives_store_reload() -> Result<()> {
        let (auth, _) = signed_in_stores().await;
        let user = auth.current_user().unwrap();

        // A fresh store over the same backend restores the session
        let revived = AuthStore::new(
            Arc::clone(&auth.provider),
            Arc::clone(&auth.storage),
        );
        revived.load().await;
        assert_eq!(revived.current_user(), Some(user));
        assert!(revived.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn test_forgot_and_reset_flow_through_store() -> Result<()> {
        let (auth, _) = signed_in_stores().await;
        auth.sign_out().await?;

        let token = auth.forgot_password(TEST_EMAIL).await?;
        assert!(token.is_some());
        auth.reset_password(TEST_EMAIL, "Newpass1!").await?;

        assert!(auth.sign_in(TEST_EMAIL, TEST_PASSWORD).await.is_err());
        auth.clear_error();
        assert!(auth.sign_in(TEST_EMAIL, "Newpass1!").await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_password_reset_ops_toggle_loading_and_record_errors() -> Result<()> {
        let (auth, _) = signed_in_stores().await;
        auth.sign_out().await?;

        let result = auth.forgot_password("nobody@example.com").await;
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
        assert!(auth.state().error.is_some());
        assert!(!auth.state().is_loading);
        auth.clear_error();

        auth.forgot_password(TEST_EMAIL).await?;
        assert!(!auth.state().is_loading);
        assert!(auth.state().error.is_none());

        let result = auth.reset_password("nobody@example.com", "Newpass1!").await;
        assert!(matches!(result, Err(Error::ResetTokenMissing { .. })));
        assert!(auth.state().error.is_some());
        assert!(!auth.state().is_loading);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let (auth, _) = setup_stores();
        let result = auth.update_profile(ProfileUpdate::default()).await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_full_name_and_premium_derivations() -> Result<()> {
        let (auth, _) = setup_stores();
        assert_eq!(auth.user_full_name(), "Guest");
        assert!(!auth.is_premium_user());

        auth.sign_up(TEST_EMAIL, TEST_PASSWORD, NewProfile::default())
            .await?;
        // Mock accounts default to the "New User" display name
        assert_eq!(auth.user_full_name(), "New User");

        auth.update_profile(ProfileUpdate {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            role: Some(UserRole::Premium),
            ..ProfileUpdate::default()
        })
        .await?;
        assert_eq!(auth.user_full_name(), "Jane Doe");
        assert!(auth.is_premium_user());
        Ok(())
    }

    #[tokio::test]
    async fn test_onboarding_flag_round_trip() -> Result<()> {
        let (auth, _) = setup_stores();
        auth.load().await;
        assert!(!auth.onboarding_completed());

        auth.complete_onboarding().await?;
        assert!(auth.onboarding_completed());

        let revived = AuthStore::new(
            Arc::clone(&auth.provider),
            Arc::clone(&auth.storage),
        );
        revived.load().await;
        assert!(revived.onboarding_completed());
        Ok(())
    }

    #[tokio::test]
    async fn test_provider_pushes_drive_store_state() -> Result<()> {
        let (auth, _) = setup_stores();
        let _subscription = auth.subscribe_provider();

        // A session change made directly on the provider reaches the store
        auth.provider
            .create_account(TEST_EMAIL, TEST_PASSWORD, NewProfile::default())
            .await?;
        assert!(auth.is_authenticated());

        auth.provider.sign_out().await?;
        assert!(!auth.is_authenticated());
        Ok(())
    }
}
