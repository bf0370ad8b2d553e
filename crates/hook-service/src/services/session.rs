//! Session issuance and rotation
//!
//! Handles password login, refresh-token rotation with reuse detection,
//! logout, and password changes.
//!
//! The security core: a refresh token is redeemable at most once. A second
//! redemption of the same token - or a redemption from a different
//! user-agent - is treated as evidence of theft and deletes every session
//! the user has, forcing re-authentication on all devices.

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use hook_common::auth::TokenPair;
use hook_common::validate_password_strength;
use hook_core::entities::{Session, User};
use hook_core::value_objects::UserId;

use crate::dto::{AuthResponse, CurrentUserResponse, LoginRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mint an access+refresh pair and persist the refresh token's session row
    ///
    /// Issuance fails if the session row cannot be persisted: a refresh token
    /// that exists without a row would be unrevocable, so the row is written
    /// before the tokens leave this function.
    #[instrument(skip(self, user, user_agent), fields(user_id = %user.id))]
    pub async fn issue_pair(&self, user: &User, user_agent: &str) -> ServiceResult<TokenPair> {
        let jwt = self.ctx.jwt_service();

        let access_token = jwt.issue_access(user.id, &user.email)?;
        let (refresh_token, token_id) = jwt.issue_refresh(user.id, &user.email)?;

        let session = Session::new(
            user.id,
            token_id,
            Utc::now() + Duration::seconds(jwt.refresh_token_expiry()),
            user_agent.to_string(),
        );
        self.ctx.session_repo().create(&session).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.access_token_expiry(),
        })
    }

    /// Login with email and password
    #[instrument(skip(self, request, user_agent), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest, user_agent: &str) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: user not found");
                ServiceError::App(hook_common::AppError::InvalidCredentials)
            })?;

        // OAuth-only accounts have no password to check
        let password_hash = user.password_hash.as_deref().ok_or_else(|| {
            warn!(user_id = %user.id, "Login failed: no password credential");
            ServiceError::App(hook_common::AppError::InvalidCredentials)
        })?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, password_hash)
            .map_err(|e| {
                if matches!(e, hook_common::AppError::InvalidCredentials) {
                    warn!(user_id = %user.id, "Login failed: invalid password");
                }
                ServiceError::App(e)
            })?;

        info!(user_id = %user.id, "User logged in");

        self.ctx.usage_repo().get_or_create(user.id).await?;

        let pair = self.issue_pair(&user, user_agent).await?;
        Ok(AuthResponse::new(pair, CurrentUserResponse::from(&user)))
    }

    /// Rotate a refresh token
    ///
    /// On success the presented token is consumed and a fresh pair is
    /// returned. Any anomaly - unknown token identifier, already-consumed
    /// token, or a user-agent that differs from issuance - revokes the whole
    /// session family and fails with the generic authentication error.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str, user_agent: &str) -> ServiceResult<AuthResponse> {
        // Signature/expiry failures are not compromise evidence; nothing to
        // revoke since the token never came from us (or is simply stale)
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(refresh_token)
            .map_err(|_| ServiceError::authentication())?;
        let user_id = claims.user_id().map_err(|_| ServiceError::authentication())?;
        let Some(token_id) = claims.jti else {
            return Err(ServiceError::authentication());
        };

        let session = self.ctx.session_repo().find_by_token_id(&token_id).await?;

        let Some(session) = session else {
            // Valid signature but no row: the family was already revoked or
            // the row predates a purge; either way the token must not work
            return Err(self.revoke_family(user_id, "unknown token identifier").await?);
        };

        if session.user_id != user_id {
            return Err(self.revoke_family(user_id, "token subject mismatch").await?);
        }

        if session.user_agent != user_agent {
            return Err(self.revoke_family(user_id, "user agent mismatch").await?);
        }

        // Atomic consume: exactly one concurrent caller observes `true`.
        // A `false` here is indistinguishable from replay and handled the same.
        if !self.ctx.session_repo().mark_used(&token_id).await? {
            return Err(self.revoke_family(user_id, "refresh token replayed").await?);
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(ServiceError::authentication)?;

        info!(user_id = %user.id, "Refresh token rotated");

        let pair = self.issue_pair(&user, user_agent).await?;
        Ok(AuthResponse::new(pair, CurrentUserResponse::from(&user)))
    }

    /// Logout one device by consuming its refresh token
    ///
    /// Only the named session is marked used; sibling sessions on other
    /// devices stay valid.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> ServiceResult<()> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(refresh_token)
            .map_err(|_| ServiceError::authentication())?;
        let Some(ref token_id) = claims.jti else {
            return Err(ServiceError::authentication());
        };
        let user_id = claims.user_id().map_err(|_| ServiceError::authentication())?;

        // Logout is idempotent: consuming an already-used token is a no-op
        let consumed = self.ctx.session_repo().mark_used(token_id).await?;

        info!(user_id = %user_id, consumed = consumed, "User logged out");
        Ok(())
    }

    /// Delete every session for a user, forcing re-login on all devices
    #[instrument(skip(self))]
    pub async fn revoke_all_sessions(&self, user_id: UserId) -> ServiceResult<u64> {
        let removed = self.ctx.session_repo().delete_all_for_user(user_id).await?;
        info!(user_id = %user_id, removed = removed, "All sessions revoked");
        Ok(removed)
    }

    /// Change (or set) the account password
    ///
    /// When the account already has a password, the current one must be
    /// presented and verified; a wrong current password fails without
    /// touching any session. On success every session is revoked.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: Option<&str>,
        new_password: &str,
    ) -> ServiceResult<()> {
        validate_password_strength(new_password).map_err(ServiceError::from)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if let Some(existing_hash) = user.password_hash.as_deref() {
            let presented = current_password.ok_or_else(|| {
                warn!(user_id = %user_id, "Password change rejected: current password missing");
                ServiceError::App(hook_common::AppError::InvalidCredentials)
            })?;
            self.ctx
                .password_service()
                .verify_or_error(presented, existing_hash)
                .map_err(ServiceError::App)?;
        }

        let new_hash = self
            .ctx
            .password_service()
            .hash(new_password)
            .map_err(ServiceError::App)?;
        self.ctx.user_repo().update_password(user_id, &new_hash).await?;

        // A credential change invalidates every outstanding session
        self.revoke_all_sessions(user_id).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Delete expired session rows (background sweep)
    pub async fn purge_expired(&self) -> ServiceResult<u64> {
        Ok(self.ctx.session_repo().delete_expired().await?)
    }

    /// Revoke the session family in response to compromise evidence
    ///
    /// Always returns the generic authentication error so callers cannot
    /// distinguish which check tripped; the real cause goes to the log.
    async fn revoke_family(
        &self,
        user_id: UserId,
        cause: &'static str,
    ) -> ServiceResult<ServiceError> {
        warn!(user_id = %user_id, cause = cause, "Refresh anomaly; revoking session family");
        self.ctx.session_repo().delete_all_for_user(user_id).await?;
        Ok(ServiceError::authentication())
    }
}
