//! HTTP API client.
//!
//! Thin typed wrappers over the backend's REST surface. The list/item
//! endpoints exist as a parallel integration surface for the UI layer; the
//! only in-crate consumer is the remote auth provider.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::entities::{Item, List, User};
use crate::errors::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Session issued by the identity endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Extended profile document stored per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    email: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
struct ShareRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateItemRequest<'a> {
    list_id: &'a str,
    #[serde(flatten)]
    item: &'a Item,
}

/// HTTP client over the backend REST API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL with a 10 second timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&impl Serialize>,
    ) -> Result<T> {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        debug!(%method, path, "API request");

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageResponse>(&raw)
            .map_or(raw, |parsed| parsed.message);
        Err(Error::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        self.send(Method::GET, path, token, None::<&()>).await
    }

    // --- auth -------------------------------------------------------------

    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<SessionResponse> {
        self.send(Method::POST, "/auth/register", None, Some(request))
            .await
    }

    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionResponse> {
        self.send(Method::POST, "/auth/login", None, Some(request))
            .await
    }

    /// `POST /auth/logout`
    pub async fn logout(&self, token: &str) -> Result<MessageResponse> {
        self.send(Method::POST, "/auth/logout", Some(token), None::<&()>)
            .await
    }

    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        self.send(
            Method::POST,
            "/auth/forgot-password",
            None,
            Some(&EmailRequest { email }),
        )
        .await
    }

    /// `POST /auth/reset-password`
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<MessageResponse> {
        self.send(
            Method::POST,
            "/auth/reset-password",
            None,
            Some(&ResetPasswordRequest {
                email,
                new_password,
            }),
        )
        .await
    }

    // --- user profile -----------------------------------------------------

    /// `GET /user/profile`
    ///
    /// Absence of the document maps to a default (empty) profile rather
    /// than an error.
    pub async fn get_profile(&self, token: &str) -> Result<ProfileDocument> {
        match self.get("/user/profile", Some(token)).await {
            Ok(profile) => Ok(profile),
            Err(Error::Http {
                status: status @ 404,
                ..
            }) => {
                debug!(status, "No profile document for user");
                Ok(ProfileDocument::default())
            }
            Err(e) => Err(e),
        }
    }

    /// `PUT /user/profile`
    pub async fn update_profile(
        &self,
        token: &str,
        profile: &ProfileDocument,
    ) -> Result<ProfileDocument> {
        self.send(Method::PUT, "/user/profile", Some(token), Some(profile))
            .await
    }

    // --- lists ------------------------------------------------------------

    /// `GET /lists`
    pub async fn get_lists(&self, token: &str) -> Result<Vec<List>> {
        self.get("/lists", Some(token)).await
    }

    /// `POST /lists`
    pub async fn create_list(&self, token: &str, list: &List) -> Result<List> {
        self.send(Method::POST, "/lists", Some(token), Some(list))
            .await
    }

    /// `PUT /lists/:id`
    pub async fn update_list(&self, token: &str, id: &str, list: &List) -> Result<List> {
        self.send(Method::PUT, &format!("/lists/{id}"), Some(token), Some(list))
            .await
    }

    /// `DELETE /lists/:id`
    pub async fn delete_list(&self, token: &str, id: &str) -> Result<MessageResponse> {
        self.send(
            Method::DELETE,
            &format!("/lists/{id}"),
            Some(token),
            None::<&()>,
        )
        .await
    }

    /// `POST /lists/:id/share`
    pub async fn share_list(&self, token: &str, id: &str, email: &str) -> Result<MessageResponse> {
        self.send(
            Method::POST,
            &format!("/lists/{id}/share"),
            Some(token),
            Some(&ShareRequest { email }),
        )
        .await
    }

    /// `POST /lists/:id/unshare`
    pub async fn unshare_list(
        &self,
        token: &str,
        id: &str,
        email: &str,
    ) -> Result<MessageResponse> {
        self.send(
            Method::POST,
            &format!("/lists/{id}/unshare"),
            Some(token),
            Some(&ShareRequest { email }),
        )
        .await
    }

    // --- items ------------------------------------------------------------

    /// `POST /items`
    pub async fn create_item(&self, token: &str, list_id: &str, item: &Item) -> Result<Item> {
        self.send(
            Method::POST,
            "/items",
            Some(token),
            Some(&CreateItemRequest { list_id, item }),
        )
        .await
    }

    /// `PUT /items/:id`
    pub async fn update_item(&self, token: &str, id: &str, item: &Item) -> Result<Item> {
        self.send(Method::PUT, &format!("/items/{id}"), Some(token), Some(item))
            .await
    }

    /// `DELETE /items/:id`
    pub async fn delete_item(&self, token: &str, id: &str) -> Result<MessageResponse> {
        self.send(
            Method::DELETE,
            &format!("/items/{id}"),
            Some(token),
            None::<&()>,
        )
        .await
    }

    /// `POST /items/:id/toggle`
    pub async fn toggle_item(&self, token: &str, id: &str) -> Result<Item> {
        self.send(
            Method::POST,
            &format!("/items/{id}/toggle"),
            Some(token),
            None::<&()>,
        )
        .await
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/lists"), "http://localhost:3000/lists");

        let client = ApiClient::new("http://localhost:3000");
        assert_eq!(client.url("/lists"), "http://localhost:3000/lists");
    }

    #[test]
    fn test_register_request_omits_unset_profile_fields() {
        let json = serde_json::to_string(&RegisterRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
            display_name: Some("A".to_string()),
            first_name: None,
            last_name: None,
        })
        .unwrap();
        assert!(json.contains("display_name"));
        assert!(!json.contains("first_name"));
    }

    #[test]
    fn test_session_response_shape() {
        let session: SessionResponse = serde_json::from_str(
            r#"{
                "user": {"uid":"u-1","email":"a@b.com","created_at":"2025-01-15T10:00:00Z"},
                "access_token": "at",
                "refresh_token": "rt"
            }"#,
        )
        .unwrap();
        assert_eq!(session.user.uid, "u-1");
        assert_eq!(session.access_token, "at");
    }

    #[test]
    fn test_profile_document_tolerates_missing_fields() {
        let profile: ProfileDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, ProfileDocument::default());
    }
}
