//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Signup Requests
// ============================================================================

/// Signup request; creates a pending verification token, not a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: String,

    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
}

/// Signup confirmation request carrying the emailed code
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmSignupRequest {
    pub code: String,
}

// ============================================================================
// Login Requests
// ============================================================================

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// OAuth provider login/link request carrying the authorization code
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderLoginRequest {
    pub code: String,
}

// ============================================================================
// Session Requests
// ============================================================================

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request naming the refresh token to consume
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

// ============================================================================
// Account Requests
// ============================================================================

/// Password change request
///
/// `current_password` is required when the account already has one; an
/// OAuth-only account sets its first password without it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}
