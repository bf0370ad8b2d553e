//! Authentication handlers
//!
//! Endpoints for signup, login, provider login/linking, token refresh,
//! logout, and password changes.

use axum::{
    extract::{Path, State},
    Json,
};
use hook_core::value_objects::Provider;
use hook_service::{
    AuthResponse, ChangePasswordRequest, ConfirmSignupRequest, CurrentUserResponse,
    IdentityService, LoginRequest, LogoutRequest, ProviderLoginRequest, RefreshTokenRequest,
    SessionService, SignupPendingResponse, SignupRequest, SignupService,
};

use crate::extractors::{AuthUser, ClientAgent, ValidatedJson};
use crate::response::{Accepted, ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// Parse the `:provider` path segment into an OAuth provider tag
fn parse_provider(tag: &str) -> ApiResult<Provider> {
    match tag {
        "discord" => Ok(Provider::Discord),
        "google" => Ok(Provider::Google),
        other => Err(ApiError::invalid_path(format!("unknown provider: {other}"))),
    }
}

/// Request a signup; mails a verification code
///
/// POST /auth/signup
pub async fn request_signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Accepted<Json<SignupPendingResponse>>> {
    let service = SignupService::new(state.service_context());
    let response = service.request_signup(request).await?;
    Ok(Accepted(Json(response)))
}

/// Confirm a signup code; creates the user and issues tokens
///
/// POST /auth/signup/confirm
pub async fn confirm_signup(
    State(state): State<AppState>,
    agent: ClientAgent,
    Json(request): Json<ConfirmSignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = SignupService::new(state.service_context());
    let response = service.confirm_signup(&request.code, agent.as_str()).await?;
    Ok(Json(response))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    agent: ClientAgent,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.login(request, agent.as_str()).await?;
    Ok(Json(response))
}

/// Login (or sign up) through an OAuth provider
///
/// POST /auth/providers/:provider
pub async fn provider_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    agent: ClientAgent,
    Json(request): Json<ProviderLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let provider = parse_provider(&provider)?;
    let service = IdentityService::new(state.service_context());
    let response = service
        .login_with_provider(provider, &request.code, agent.as_str())
        .await?;
    Ok(Json(response))
}

/// Link an OAuth provider to the authenticated account
///
/// POST /auth/providers/:provider/link
pub async fn link_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    auth: AuthUser,
    Json(request): Json<ProviderLoginRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let provider = parse_provider(&provider)?;
    let service = IdentityService::new(state.service_context());
    let response = service
        .link_provider(provider, &request.code, auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Rotate a refresh token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    agent: ClientAgent,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.refresh(&request.refresh_token, agent.as_str()).await?;
    Ok(Json(response))
}

/// Logout one device by consuming its refresh token
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> ApiResult<NoContent> {
    let service = SessionService::new(state.service_context());
    service.logout(&request.refresh_token).await?;
    Ok(NoContent)
}

/// Change (or set) the account password; revokes all sessions on success
///
/// POST /auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    let service = SessionService::new(state.service_context());
    service
        .change_password(
            auth.user_id,
            request.current_password.as_deref(),
            &request.new_password,
        )
        .await?;
    Ok(NoContent)
}
