//! User entity - account identity as held in the session.
//!
//! The session user never carries a password. The mock identity provider
//! keeps credentials in its own private record type and strips them before
//! anything reaches this struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Free tier (the default)
    #[default]
    Free,
    /// Paid individual plan
    Premium,
    /// Paid family plan
    Family,
}

/// A signed-in user as exposed to the rest of the crate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID v4 in mock mode, provider id otherwise)
    pub uid: String,
    /// Sign-in email address
    pub email: String,
    /// Free-form display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Given name, if the profile has one
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name, if the profile has one
    #[serde(default)]
    pub last_name: Option<String>,
    /// Subscription tier, if known
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Raw subscription label from the billing side, if any
    #[serde(default)]
    pub subscription: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Presentable name for the user.
    ///
    /// Prefers `"{first} {last}"` (trimmed) when either part is set, then
    /// the display name, then the email, and finally `"User"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        if !first.is_empty() || !last.is_empty() {
            return format!("{first} {last}").trim().to_string();
        }
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if !self.email.is_empty() {
            return self.email.clone();
        }
        "User".to_string()
    }

    /// Whether the account is on a premium plan, either by role or by a
    /// `"premium"` subscription label (case-insensitive).
    #[must_use]
    pub fn is_premium(&self) -> bool {
        self.role == Some(UserRole::Premium)
            || self
                .subscription
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("premium"))
    }
}

/// Optional profile fields supplied at account creation.
#[derive(Clone, Debug, Default)]
pub struct NewProfile {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub subscription: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn bare_user() -> User {
        User {
            uid: "u-1".to_string(),
            email: "jane@example.com".to_string(),
            display_name: None,
            first_name: None,
            last_name: None,
            role: None,
            subscription: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name_prefers_first_and_last() {
        let mut user = bare_user();
        user.first_name = Some("Jane".to_string());
        user.last_name = Some("Doe".to_string());
        user.display_name = Some("janed".to_string());
        assert_eq!(user.full_name(), "Jane Doe");
    }

    #[test]
    fn test_full_name_single_part_is_trimmed() {
        let mut user = bare_user();
        user.first_name = Some("Jane".to_string());
        assert_eq!(user.full_name(), "Jane");

        let mut user = bare_user();
        user.last_name = Some("Doe".to_string());
        assert_eq!(user.full_name(), "Doe");
    }

    #[test]
    fn test_full_name_falls_back_to_display_name_then_email() {
        let mut user = bare_user();
        user.display_name = Some("janed".to_string());
        assert_eq!(user.full_name(), "janed");

        user.display_name = None;
        assert_eq!(user.full_name(), "jane@example.com");

        user.email = String::new();
        assert_eq!(user.full_name(), "User");
    }

    #[test]
    fn test_empty_strings_are_treated_as_unset() {
        let mut user = bare_user();
        user.first_name = Some(String::new());
        user.display_name = Some("janed".to_string());
        assert_eq!(user.full_name(), "janed");
    }

    #[test]
    fn test_is_premium_by_role_or_subscription_label() {
        let mut user = bare_user();
        assert!(!user.is_premium());

        user.role = Some(UserRole::Premium);
        assert!(user.is_premium());

        user.role = Some(UserRole::Free);
        user.subscription = Some("Premium".to_string());
        assert!(user.is_premium());

        user.subscription = Some("family".to_string());
        assert!(!user.is_premium());
    }

    #[test]
    fn test_session_json_has_no_password_field() {
        let json = serde_json::to_string(&bare_user()).unwrap();
        assert!(!json.contains("password"));
    }
}
