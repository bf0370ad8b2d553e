//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use hook_common::TokenPair;
use hook_core::entities::User;
use hook_core::value_objects::Provider;
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(pair: TokenPair, user: CurrentUserResponse) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user,
        }
    }
}

/// Response for a signup request awaiting email confirmation
#[derive(Debug, Serialize)]
pub struct SignupPendingResponse {
    pub email: String,
    pub message: String,
}

impl SignupPendingResponse {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            message: "Check your inbox for a verification code".to_string(),
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Current user response (full account view)
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub display_name: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub plan: String,
    pub guild_ids: Vec<String>,
    pub has_password: bool,
    pub linked_provider: Option<Provider>,
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            display_name: user.display_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            plan: user.plan.as_str().to_string(),
            guild_ids: user.guild_ids.clone(),
            has_password: user.has_password(),
            linked_provider: user.linked_provider(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hook_core::value_objects::UserId;

    #[test]
    fn test_current_user_response_from_user() {
        let mut user = User::new(
            UserId::new(),
            "Test".to_string(),
            "test".to_string(),
            "test@example.com".to_string(),
        );
        user.set_provider_id(Provider::Discord, "d-1".to_string());

        let response = CurrentUserResponse::from(&user);
        assert_eq!(response.username, "test");
        assert_eq!(response.plan, "free");
        assert!(!response.has_password);
        assert_eq!(response.linked_provider, Some(Provider::Discord));
    }

    #[test]
    fn test_auth_response_shape() {
        let user = User::new(
            UserId::new(),
            "Test".to_string(),
            "test".to_string(),
            "test@example.com".to_string(),
        );
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 900,
        };

        let response = AuthResponse::new(pair, CurrentUserResponse::from(&user));
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
    }
}
