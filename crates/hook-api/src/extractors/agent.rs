//! Client user-agent extractor
//!
//! Refresh tokens are bound to the user-agent they were issued to, so every
//! auth handler needs the header in a uniform shape. A missing header
//! extracts as the empty string, which then has to match at refresh time
//! like any other agent value.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// The requesting client's User-Agent header, or empty when absent
#[derive(Debug, Clone)]
pub struct ClientAgent(pub String);

impl ClientAgent {
    /// The header value as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientAgent
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let agent = parts
            .headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(Self(agent))
    }
}
