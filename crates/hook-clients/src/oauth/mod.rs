//! OAuth provider clients
//!
//! One client per provider, each normalizing its responses into the shared
//! [`hook_core::ProviderProfile`] shape.

mod discord;
mod google;

pub use discord::DiscordOAuthClient;
pub use google::GoogleOAuthClient;

use std::time::Duration;

use hook_core::error::DomainError;
use hook_core::value_objects::Provider;

/// Request timeout applied to every provider call
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client with the provider timeout applied
pub(crate) fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Map a transport-level error (timeout, DNS, connection reset) to a domain error
pub(crate) fn transport_error(provider: Provider, e: &reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::ExternalApi(format!("{provider} request timed out"))
    } else {
        DomainError::ExternalApi(format!("{provider} request failed: {e}"))
    }
}

/// Map a non-2xx provider response to a domain error
pub(crate) fn status_error(provider: Provider, context: &str, status: reqwest::StatusCode) -> DomainError {
    DomainError::ExternalApi(format!("{provider} {context} returned {status}"))
}
