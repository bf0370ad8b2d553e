//! Email-verified signup
//!
//! A signup request stores pending account data in a verification token and
//! mails out a code; confirming the code creates the user. Repeating an
//! identical request resends the same code instead of minting a duplicate.

use tracing::{info, instrument, warn};

use hook_core::entities::{EmailVerificationToken, User};
use hook_core::error::DomainError;
use hook_core::value_objects::UserId;

use crate::dto::{AuthResponse, CurrentUserResponse, SignupPendingResponse, SignupRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::SessionService;

/// Signup service
pub struct SignupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SignupService<'a> {
    /// Create a new SignupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a signup: store pending data and mail a verification code
    #[instrument(skip(self, request), fields(email = %request.email, username = %request.username))]
    pub async fn request_signup(&self, request: SignupRequest) -> ServiceResult<SignupPendingResponse> {
        hook_common::validate_password_strength(&request.password).map_err(ServiceError::from)?;

        // The email may already belong to an account; a provider-linked
        // owner gets a distinct message pointing at the right login path
        if let Some(owner) = self.ctx.user_repo().find_by_email(&request.email).await? {
            return Err(match owner.linked_provider() {
                Some(provider) => DomainError::EmailLinkedToProvider(provider).into(),
                None => DomainError::EmailAlreadyExists.into(),
            });
        }

        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(DomainError::UsernameTaken.into());
        }

        if let Some(pending) = self
            .ctx
            .verification_repo()
            .find_active_by_email(&request.email)
            .await?
        {
            // Identical retry: resend the same code instead of creating a
            // second pending record
            if pending.display_name == request.display_name
                && pending.username == request.username
                && self
                    .ctx
                    .password_service()
                    .verify(&request.password, &pending.password_hash)
                    .map_err(ServiceError::App)?
            {
                self.ctx
                    .mail_sender()
                    .send_verification(&pending.email, &pending.code)
                    .await?;

                info!(email = %pending.email, "Verification code resent");
                return Ok(SignupPendingResponse::new(pending.email));
            }

            // Changed details supersede the old pending token
            self.ctx.verification_repo().mark_used(pending.id).await?;
        }

        let password_hash = self
            .ctx
            .password_service()
            .hash(&request.password)
            .map_err(ServiceError::App)?;

        let token = EmailVerificationToken::new(
            request.email,
            password_hash,
            request.display_name,
            request.username,
        );
        self.ctx.verification_repo().create(&token).await?;

        self.ctx
            .mail_sender()
            .send_verification(&token.email, &token.code)
            .await?;

        info!(email = %token.email, "Signup requested, verification code sent");
        Ok(SignupPendingResponse::new(token.email))
    }

    /// Confirm a signup code: create the user and issue a token pair
    #[instrument(skip(self, code, user_agent))]
    pub async fn confirm_signup(&self, code: &str, user_agent: &str) -> ServiceResult<AuthResponse> {
        let token = self
            .ctx
            .verification_repo()
            .find_by_code(code)
            .await?
            .ok_or(DomainError::VerificationCodeInvalid)?;

        if token.used {
            return Err(DomainError::VerificationCodeInvalid.into());
        }

        if token.is_expired() {
            return Err(DomainError::VerificationCodeExpired.into());
        }

        // A user may have appeared for this email since the request (OAuth
        // login, another signup flow). Burn the token either way so the code
        // cannot be retried against the now-taken email.
        if self.ctx.user_repo().find_by_email(&token.email).await?.is_some() {
            self.ctx.verification_repo().mark_used(token.id).await?;
            warn!(email = %token.email, "Signup confirmation raced an existing user");
            return Err(DomainError::EmailAlreadyExists.into());
        }

        if self.ctx.user_repo().username_exists(&token.username).await? {
            self.ctx.verification_repo().mark_used(token.id).await?;
            return Err(DomainError::UsernameTaken.into());
        }

        let user = User::new(
            UserId::new(),
            token.display_name.clone(),
            token.username.clone(),
            token.email.clone(),
        )
        .with_password_hash(token.password_hash.clone());

        self.ctx.user_repo().create(&user).await?;
        self.ctx.verification_repo().mark_used(token.id).await?;
        self.ctx.usage_repo().get_or_create(user.id).await?;

        info!(user_id = %user.id, "Signup confirmed, user created");

        let pair = SessionService::new(self.ctx).issue_pair(&user, user_agent).await?;
        Ok(AuthResponse::new(pair, CurrentUserResponse::from(&user)))
    }

    /// Delete expired and stale used verification tokens (background sweep)
    pub async fn purge_expired(&self) -> ServiceResult<u64> {
        Ok(self.ctx.verification_repo().delete_expired().await?)
    }
}
