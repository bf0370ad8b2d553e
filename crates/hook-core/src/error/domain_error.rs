//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Provider, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Verification code is invalid")]
    VerificationCodeInvalid,

    #[error("Verification code has expired")]
    VerificationCodeExpired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Email already in use by a {0}-linked account")]
    EmailLinkedToProvider(Provider),

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Account is linked to a different provider")]
    LinkedToDifferentProvider,

    #[error("Account already linked to {0}")]
    AlreadyLinked(Provider),

    #[error("This {0} identity is linked to another account")]
    ProviderIdInUse(Provider),

    #[error("Provider email does not match account email")]
    ProviderEmailMismatch,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::VerificationCodeInvalid => "VERIFICATION_CODE_INVALID",
            Self::VerificationCodeExpired => "VERIFICATION_CODE_EXPIRED",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::EmailLinkedToProvider(_) => "EMAIL_LINKED_TO_PROVIDER",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::LinkedToDifferentProvider => "LINKED_TO_DIFFERENT_PROVIDER",
            Self::AlreadyLinked(_) => "ALREADY_LINKED",
            Self::ProviderIdInUse(_) => "PROVIDER_ID_IN_USE",
            Self::ProviderEmailMismatch => "PROVIDER_EMAIL_MISMATCH",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::ExternalApi(_) => "EXTERNAL_API_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::VerificationCodeInvalid
                | Self::VerificationCodeExpired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::EmailLinkedToProvider(_)
                | Self::UsernameTaken
                | Self::LinkedToDifferentProvider
                | Self::AlreadyLinked(_)
                | Self::ProviderIdInUse(_)
                | Self::ProviderEmailMismatch
        )
    }

    /// Check if this is an external-API error
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalApi(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound(UserId::new());
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::LinkedToDifferentProvider;
        assert_eq!(err.code(), "LINKED_TO_DIFFERENT_PROVIDER");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::UserNotFound(UserId::new()).is_not_found());
        assert!(!DomainError::EmailAlreadyExists.is_not_found());
    }

    #[test]
    fn test_is_validation() {
        assert!(DomainError::VerificationCodeExpired.is_validation());
        assert!(DomainError::VerificationCodeInvalid.is_validation());
        assert!(!DomainError::UsernameTaken.is_validation());
    }

    #[test]
    fn test_is_conflict() {
        assert!(DomainError::EmailAlreadyExists.is_conflict());
        assert!(DomainError::AlreadyLinked(Provider::Discord).is_conflict());
        assert!(!DomainError::ExternalApi("timeout".to_string()).is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::EmailLinkedToProvider(Provider::Discord);
        assert_eq!(
            err.to_string(),
            "Email already in use by a discord-linked account"
        );
    }
}
