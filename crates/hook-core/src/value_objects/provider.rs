//! Identity providers and normalized provider profiles
//!
//! Keeping the provider as a tagged enum (rather than string comparison at
//! every call site) keeps the identity-linking algorithm provider-agnostic:
//! only the OAuth clients know how to normalize a provider response into a
//! [`ProviderProfile`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity provider an account can authenticate through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Password,
    Discord,
    Google,
}

impl Provider {
    /// Stable string form used in logs and API responses
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Discord => "discord",
            Self::Google => "google",
        }
    }

    /// Whether this provider is an external OAuth provider
    #[inline]
    #[must_use]
    pub const fn is_oauth(self) -> bool {
        matches!(self, Self::Discord | Self::Google)
    }

    /// Discord accounts may change their email, so they are resolved by
    /// provider id; password and Google identities resolve by email.
    #[inline]
    #[must_use]
    pub const fn resolves_by_email(self) -> bool {
        !matches!(self, Self::Discord)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized identity profile returned by an OAuth provider
///
/// Every provider-specific response shape is flattened into this one struct
/// before it reaches the linking algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider-assigned stable user identifier
    pub id: String,
    /// Email as reported by the provider
    pub email: String,
    /// Display name as reported by the provider
    pub display_name: String,
    /// Avatar reference, if the provider supplied one
    pub avatar: Option<String>,
    /// Opaque community/guild references (Discord only; empty otherwise)
    #[serde(default)]
    pub guild_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_str() {
        assert_eq!(Provider::Password.as_str(), "password");
        assert_eq!(Provider::Discord.as_str(), "discord");
        assert_eq!(Provider::Google.as_str(), "google");
    }

    #[test]
    fn test_resolution_mode() {
        assert!(Provider::Password.resolves_by_email());
        assert!(Provider::Google.resolves_by_email());
        assert!(!Provider::Discord.resolves_by_email());
    }

    #[test]
    fn test_is_oauth() {
        assert!(!Provider::Password.is_oauth());
        assert!(Provider::Discord.is_oauth());
        assert!(Provider::Google.is_oauth());
    }
}
