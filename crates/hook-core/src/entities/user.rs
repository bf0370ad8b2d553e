//! User entity - an account that owns webhooks, templates, and sessions

use chrono::{DateTime, Utc};

use crate::value_objects::{AccountPlan, Provider, ProviderProfile, UserId};

/// User account
///
/// A user is resolvable by email or by exactly one external provider id.
/// The password hash is optional: OAuth-only accounts never have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub discord_id: Option<String>,
    pub google_id: Option<String>,
    pub avatar: Option<String>,
    pub plan: AccountPlan,
    pub guild_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(
        id: UserId,
        display_name: String,
        username: String,
        email: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            display_name,
            username,
            email,
            password_hash: None,
            discord_id: None,
            google_id: None,
            avatar: None,
            plan: AccountPlan::Free,
            guild_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Attach a password hash at construction
    #[must_use]
    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }

    /// Check if this account has a password credential
    #[inline]
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check if this account is soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Get the id recorded for an external provider
    pub fn provider_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Discord => self.discord_id.as_deref(),
            Provider::Google => self.google_id.as_deref(),
            Provider::Password => None,
        }
    }

    /// Record an external provider id
    pub fn set_provider_id(&mut self, provider: Provider, id: String) {
        match provider {
            Provider::Discord => self.discord_id = Some(id),
            Provider::Google => self.google_id = Some(id),
            Provider::Password => {}
        }
        self.updated_at = Utc::now();
    }

    /// The external provider this account is linked to, if any
    ///
    /// An account carries at most one external provider id; the linking
    /// algorithm rejects a second provider sharing the same email.
    pub fn linked_provider(&self) -> Option<Provider> {
        if self.discord_id.is_some() {
            Some(Provider::Discord)
        } else if self.google_id.is_some() {
            Some(Provider::Google)
        } else {
            None
        }
    }

    /// Sync cached profile fields from a fresh provider profile
    pub fn apply_profile(&mut self, profile: &ProviderProfile) {
        self.display_name.clone_from(&profile.display_name);
        if profile.avatar.is_some() {
            self.avatar.clone_from(&profile.avatar);
        }
        self.guild_ids.clone_from(&profile.guild_ids);
        self.updated_at = Utc::now();
    }

    /// Replace the password hash
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = Some(hash);
        self.updated_at = Utc::now();
    }
}
