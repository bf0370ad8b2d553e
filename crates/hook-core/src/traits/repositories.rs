//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{EmailVerificationToken, Session, User};
use crate::error::DomainError;
use crate::value_objects::{Provider, UserId, VerificationTokenId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by external provider id
    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> RepoResult<Option<User>>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Of the given candidates, return the usernames that are already taken
    ///
    /// Single batched query backing the unique-username synthesis routine.
    async fn find_usernames_in(&self, candidates: &[String]) -> RepoResult<Vec<String>>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Update an existing user (profile fields and provider links)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Update password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;

    /// Soft delete a user
    async fn delete(&self, id: UserId) -> RepoResult<()>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session row
    async fn create(&self, session: &Session) -> RepoResult<()>;

    /// Find session by its token identifier (jti)
    async fn find_by_token_id(&self, token_id: &str) -> RepoResult<Option<Session>>;

    /// Atomically mark a session used
    ///
    /// Updates the row only if it is currently unused and returns whether
    /// the update happened. A `false` return means another request already
    /// consumed the token; callers must treat it identically to reuse.
    async fn mark_used(&self, token_id: &str) -> RepoResult<bool>;

    /// Delete every session row for a user (family revoke)
    ///
    /// Returns the number of rows removed.
    async fn delete_all_for_user(&self, user_id: UserId) -> RepoResult<u64>;

    /// Delete expired session rows
    async fn delete_expired(&self) -> RepoResult<u64>;
}

// ============================================================================
// Verification Token Repository
// ============================================================================

#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Find the pending (unused, unexpired) token for an email, if any
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> RepoResult<Option<EmailVerificationToken>>;

    /// Find token by its verification code
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<EmailVerificationToken>>;

    /// Persist a new pending token
    async fn create(&self, token: &EmailVerificationToken) -> RepoResult<()>;

    /// Mark a token used
    async fn mark_used(&self, id: VerificationTokenId) -> RepoResult<()>;

    /// Delete expired and stale used tokens
    async fn delete_expired(&self) -> RepoResult<u64>;
}

// ============================================================================
// Usage Repository
// ============================================================================

/// Usage/quota records are owned by the rest of the application; the auth
/// core only guarantees one exists after a login or signup.
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Idempotently ensure a usage record exists for the user
    async fn get_or_create(&self, user_id: UserId) -> RepoResult<()>;
}
