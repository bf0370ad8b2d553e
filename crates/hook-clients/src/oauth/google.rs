//! Google OAuth client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use hook_common::config::OAuthProviderConfig;
use hook_core::error::DomainError;
use hook_core::traits::OAuthClient;
use hook_core::value_objects::{Provider, ProviderProfile};

use super::{build_http_client, status_error, transport_error};

const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OpenID Connect userinfo response (the fields we use)
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// OAuth client for Google
///
/// Requires the `openid email profile` scopes on the authorization request.
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuthClient {
    /// Create a client from provider configuration
    #[must_use]
    pub fn new(config: &OAuthProviderConfig) -> Self {
        Self {
            http: build_http_client(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            userinfo_url: DEFAULT_USERINFO_URL.to_string(),
        }
    }

    /// Override the endpoint URLs (integration tests)
    #[must_use]
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.userinfo_url = userinfo_url.into();
        self
    }

    fn normalize(info: GoogleUserInfo) -> Result<ProviderProfile, DomainError> {
        if info.email.is_empty() {
            return Err(DomainError::ExternalApi(
                "google profile did not include an email".to_string(),
            ));
        }

        let email = info.email.to_lowercase();
        Ok(ProviderProfile {
            id: info.sub,
            // Google does not always return a name claim; the email
            // local-part is a serviceable display name
            display_name: info
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string()),
            email,
            avatar: info.picture,
            guild_ids: Vec::new(),
        })
    }
}

#[async_trait]
impl OAuthClient for GoogleOAuthClient {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> Result<String, DomainError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Google, &e))?;

        if !response.status().is_success() {
            return Err(status_error(Provider::Google, "token endpoint", response.status()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| transport_error(Provider::Google, &e))?;

        Ok(token.access_token)
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, DomainError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Google, &e))?;

        if !response.status().is_success() {
            return Err(status_error(Provider::Google, "userinfo endpoint", response.status()));
        }

        let info: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| transport_error(Provider::Google, &e))?;

        Self::normalize(info)
    }
}

impl std::fmt::Debug for GoogleOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthClient")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_profile() {
        let info = GoogleUserInfo {
            sub: "10769150350006150715113082367".to_string(),
            email: "Jenny@Gmail.com".to_string(),
            name: Some("Jenny Smith".to_string()),
            picture: Some("https://example.com/photo.jpg".to_string()),
        };

        let profile = GoogleOAuthClient::normalize(info).unwrap();
        assert_eq!(profile.id, "10769150350006150715113082367");
        assert_eq!(profile.email, "jenny@gmail.com");
        assert_eq!(profile.display_name, "Jenny Smith");
        assert!(profile.guild_ids.is_empty());
    }

    #[test]
    fn test_normalize_missing_name_uses_local_part() {
        let info = GoogleUserInfo {
            sub: "123".to_string(),
            email: "jenny@gmail.com".to_string(),
            name: None,
            picture: None,
        };

        let profile = GoogleOAuthClient::normalize(info).unwrap();
        assert_eq!(profile.display_name, "jenny");
    }

    #[test]
    fn test_normalize_rejects_empty_email() {
        let info = GoogleUserInfo {
            sub: "123".to_string(),
            email: String::new(),
            name: None,
            picture: None,
        };

        assert!(matches!(
            GoogleOAuthClient::normalize(info),
            Err(DomainError::ExternalApi(_))
        ));
    }

    #[test]
    fn test_userinfo_deserialization() {
        let json = r#"{
            "sub": "10769150350006150715113082367",
            "email": "jenny@gmail.com",
            "email_verified": true,
            "name": "Jenny",
            "picture": "https://lh3.googleusercontent.com/photo.jpg"
        }"#;

        let info: GoogleUserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.sub, "10769150350006150715113082367");
        assert_eq!(info.name.as_deref(), Some("Jenny"));
    }
}
