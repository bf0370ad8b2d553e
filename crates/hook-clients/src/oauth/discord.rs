//! Discord OAuth client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use hook_common::config::OAuthProviderConfig;
use hook_core::error::DomainError;
use hook_core::traits::OAuthClient;
use hook_core::value_objects::{Provider, ProviderProfile};

use super::{build_http_client, status_error, transport_error};

const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Discord user object (the fields we use)
#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    global_name: Option<String>,
    email: Option<String>,
    avatar: Option<String>,
}

/// Entry in the current user's guild list
#[derive(Debug, Deserialize)]
struct DiscordGuild {
    id: String,
}

/// OAuth client for Discord
///
/// Requires the `identify`, `email`, and `guilds` scopes on the
/// authorization request.
pub struct DiscordOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_base: String,
}

impl DiscordOAuthClient {
    /// Create a client from provider configuration
    #[must_use]
    pub fn new(config: &OAuthProviderConfig) -> Self {
        Self {
            http: build_http_client(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (integration tests)
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn normalize(user: DiscordUser, guild_ids: Vec<String>) -> Result<ProviderProfile, DomainError> {
        // No email means the authorization was made without the email scope;
        // the account cannot be resolved or merged without one
        let email = user.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            DomainError::ExternalApi("discord profile did not include an email".to_string())
        })?;

        Ok(ProviderProfile {
            display_name: user.global_name.unwrap_or_else(|| user.username.clone()),
            id: user.id,
            email: email.to_lowercase(),
            avatar: user.avatar,
            guild_ids,
        })
    }
}

#[async_trait]
impl OAuthClient for DiscordOAuthClient {
    fn provider(&self) -> Provider {
        Provider::Discord
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
            .post(format!("{}/oauth2/token", self.api_base))
            .form(&params)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Discord, &e))?;

        if !response.status().is_success() {
            return Err(status_error(Provider::Discord, "token endpoint", response.status()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| transport_error(Provider::Discord, &e))?;

        Ok(token.access_token)
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, DomainError> {
        let response = self
            .http
            .get(format!("{}/users/@me", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Discord, &e))?;

        if !response.status().is_success() {
            return Err(status_error(Provider::Discord, "user endpoint", response.status()));
        }

        let user: DiscordUser = response
            .json()
            .await
            .map_err(|e| transport_error(Provider::Discord, &e))?;

        // Guild list is best-effort profile metadata; a failure here should
        // not break the login
        let guild_ids = match self
            .http
            .get(format!("{}/users/@me/guilds", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp
                .json::<Vec<DiscordGuild>>()
                .await
                .map(|guilds| guilds.into_iter().map(|g| g.id).collect())
                .unwrap_or_default(),
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Discord guild list fetch failed");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discord guild list fetch failed");
                Vec::new()
            }
        };

        Self::normalize(user, guild_ids)
    }
}

impl std::fmt::Debug for DiscordOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordOAuthClient")
            .field("client_id", &self.client_id)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
