//! Route definitions
//!
//! Auth routes are mounted under /api/v1; health probes live at the root so
//! they bypass rate limiting.

use axum::{routing::{get, post}, Router};

use crate::handlers::{auth, health};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", auth_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::request_signup))
        .route("/auth/signup/confirm", post(auth::confirm_signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/providers/:provider", post(auth::provider_login))
        .route("/auth/providers/:provider/link", post(auth::link_provider))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/password", post(auth::change_password))
}
