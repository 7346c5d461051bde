//! Storage key constants.
//!
//! Key strings are part of the persisted data layout; changing one orphans
//! existing data under the old key.

/// Base key for the per-user lists collection; see [`lists_key`].
pub const LISTS: &str = "@grocery_buddy_lists";
/// Persisted theme mode preference (`"light" | "dark" | "auto"`).
pub const THEME_PREFERENCE: &str = "@grocery_buddy_theme";
/// `"true"` once the first-run onboarding flow has been completed.
pub const ONBOARDING_COMPLETED: &str = "@grocery_buddy_onboarding_completed";
/// Access token issued by the remote identity provider (secure storage).
pub const ACCESS_TOKEN: &str = "@grocery_buddy_access_token";
/// Refresh token issued by the remote identity provider (secure storage).
pub const REFRESH_TOKEN: &str = "@grocery_buddy_refresh_token";
/// Session user snapshot in remote mode.
pub const USER_DATA: &str = "@grocery_buddy_user_data";
/// Mock provider's users table (JSON array, includes mock passwords).
pub const MOCK_USERS: &str = "MOCK_USERS_DB";
/// Mock provider's current session user (JSON, never with a password).
pub const CURRENT_SESSION: &str = "CURRENT_USER_SESSION";

/// Key holding one user's lists collection.
#[must_use]
pub fn lists_key(uid: &str) -> String {
    format!("{LISTS}_{uid}")
}

/// Key holding the one-time password-reset token for an email.
#[must_use]
pub fn reset_token_key(email: &str) -> String {
    format!("RESET_TOKEN_{email}")
}
