//! Outbound client traits (ports) - OAuth providers and mail delivery

use async_trait::async_trait;

use crate::error::DomainError;
use crate::value_objects::{Provider, ProviderProfile};

/// OAuth provider client
///
/// One implementation per external provider. Implementations normalize the
/// provider's response shapes into [`ProviderProfile`] so the linking
/// algorithm never branches on the provider.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// The provider this client talks to
    fn provider(&self) -> Provider;

    /// Exchange an authorization code for a provider access token
    async fn exchange_code(&self, code: &str) -> Result<String, DomainError>;

    /// Fetch the normalized identity profile for an access token
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, DomainError>;
}

/// Outbound mail sender
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Deliver a signup verification code to an address
    async fn send_verification(&self, email: &str, code: &str) -> Result<(), DomainError>;
}
