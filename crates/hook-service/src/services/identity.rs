//! Identity resolution and provider linking
//!
//! Resolves an OAuth provider identity against the user store: create a new
//! account, attach the provider to an existing one, or reject when the email
//! already belongs to an account linked to a different provider. The
//! algorithm is provider-agnostic; providers differ only in their normalized
//! profile and in whether they resolve by email or by provider id.

use tracing::{info, instrument, warn};

use hook_core::entities::User;
use hook_core::error::DomainError;
use hook_core::value_objects::{Provider, ProviderProfile, UserId};

use crate::dto::{AuthResponse, CurrentUserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::SessionService;
use super::username::generate_unique_username;

/// Identity service
pub struct IdentityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityService<'a> {
    /// Create a new IdentityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Login (or sign up) through an OAuth provider
    #[instrument(skip(self, code, user_agent))]
    pub async fn login_with_provider(
        &self,
        provider: Provider,
        code: &str,
        user_agent: &str,
    ) -> ServiceResult<AuthResponse> {
        let profile = self.fetch_profile(provider, code).await?;
        let user = self.resolve_profile(provider, profile).await?;

        self.ctx.usage_repo().get_or_create(user.id).await?;

        let pair = SessionService::new(self.ctx).issue_pair(&user, user_agent).await?;
        Ok(AuthResponse::new(pair, CurrentUserResponse::from(&user)))
    }

    /// Link a provider to an already-authenticated account
    ///
    /// Rejected when the account already carries an id for this provider,
    /// when the provider identity is linked to another account, or (Discord)
    /// when the provider email does not match the account email.
    #[instrument(skip(self, code))]
    pub async fn link_provider(
        &self,
        provider: Provider,
        code: &str,
        current_user_id: UserId,
    ) -> ServiceResult<CurrentUserResponse> {
        if !provider.is_oauth() {
            return Err(ServiceError::validation("Cannot link the password provider"));
        }

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(current_user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", current_user_id.to_string()))?;

        if user.provider_id(provider).is_some() {
            return Err(DomainError::AlreadyLinked(provider).into());
        }

        let profile = self.fetch_profile(provider, code).await?;

        // Discord emails are mutable, so an explicit link requires the
        // provider email to match the account it is being attached to
        if provider == Provider::Discord && profile.email != user.email {
            warn!(user_id = %user.id, "Link rejected: provider email mismatch");
            return Err(DomainError::ProviderEmailMismatch.into());
        }

        if let Some(owner) = self
            .ctx
            .user_repo()
            .find_by_provider_id(provider, &profile.id)
            .await?
        {
            if owner.id != user.id {
                warn!(user_id = %user.id, "Link rejected: provider identity already claimed");
                return Err(DomainError::ProviderIdInUse(provider).into());
            }
        }

        user.set_provider_id(provider, profile.id.clone());
        user.apply_profile(&profile);
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user.id, provider = %provider, "Provider linked");
        Ok(CurrentUserResponse::from(&user))
    }

    /// Exchange the authorization code and fetch the normalized profile
    async fn fetch_profile(
        &self,
        provider: Provider,
        code: &str,
    ) -> ServiceResult<ProviderProfile> {
        let client = self
            .ctx
            .oauth_client(provider)
            .ok_or_else(|| ServiceError::validation(format!("{provider} login is not configured")))?;

        let provider_token = client.exchange_code(code).await?;
        let profile = client.fetch_profile(&provider_token).await?;
        Ok(profile)
    }

    /// Resolve a provider profile to a user: create, link, sync, or reject
    async fn resolve_profile(
        &self,
        provider: Provider,
        profile: ProviderProfile,
    ) -> ServiceResult<User> {
        // Discord accounts may change email, so they resolve by provider id;
        // the rest resolve by email
        let existing = if provider.resolves_by_email() {
            self.ctx.user_repo().find_by_email(&profile.email).await?
        } else {
            self.ctx
                .user_repo()
                .find_by_provider_id(provider, &profile.id)
                .await?
        };

        let Some(mut user) = existing else {
            return self.create_from_profile(provider, profile).await;
        };

        match user.provider_id(provider).map(str::to_owned) {
            // Already linked to this exact identity: sync cached profile fields
            Some(recorded) if recorded == profile.id => {
                user.apply_profile(&profile);
                self.ctx.user_repo().update(&user).await?;
                info!(user_id = %user.id, provider = %provider, "Provider profile synced");
                Ok(user)
            }
            // Same email, different identity on the same provider
            Some(_) => {
                warn!(user_id = %user.id, provider = %provider, "Login rejected: provider identity mismatch");
                Err(DomainError::ProviderIdInUse(provider).into())
            }
            // No id for this provider yet: link, unless another provider
            // already owns this account (silent-takeover protection)
            None => {
                if let Some(other) = user.linked_provider() {
                    warn!(
                        user_id = %user.id,
                        linked = %other,
                        attempted = %provider,
                        "Login rejected: account linked to a different provider"
                    );
                    return Err(DomainError::LinkedToDifferentProvider.into());
                }

                user.set_provider_id(provider, profile.id.clone());
                user.apply_profile(&profile);
                self.ctx.user_repo().update(&user).await?;
                info!(user_id = %user.id, provider = %provider, "Provider linked on login");
                Ok(user)
            }
        }
    }

    /// First login through this provider: create the account
    async fn create_from_profile(
        &self,
        provider: Provider,
        profile: ProviderProfile,
    ) -> ServiceResult<User> {
        // Google usernames come from the email local-part; Discord profiles
        // carry a usable name of their own
        let base = match provider {
            Provider::Google => profile.email.split('@').next().unwrap_or(&profile.email),
            _ => &profile.display_name,
        };
        let username = generate_unique_username(self.ctx.user_repo(), base).await?;

        let mut user = User::new(
            UserId::new(),
            profile.display_name.clone(),
            username,
            profile.email.clone(),
        );
        user.set_provider_id(provider, profile.id.clone());
        user.avatar.clone_from(&profile.avatar);
        user.guild_ids.clone_from(&profile.guild_ids);

        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user.id, provider = %provider, "User created from provider profile");
        Ok(user)
    }
}
