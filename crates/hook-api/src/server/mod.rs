//! Server setup and initialization
//!
//! Provides the main application builder, dependency wiring, the background
//! expiration sweeper, and the server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use hook_clients::{DiscordOAuthClient, GoogleOAuthClient, HttpMailSender, NoopMailSender};
use hook_common::{AppConfig, AppError, JwtService, PasswordService};
use hook_db::{
    create_pool, PgSessionRepository, PgUsageRepository, PgUserRepository,
    PgVerificationTokenRepository,
};
use hook_service::{ServiceContextBuilder, SessionService, SignupService};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();
    let router = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    // Health probes bypass rate limiting
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = hook_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Auth primitives
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let password_service = Arc::new(PasswordService::new(config.password.work_factor));

    // Repositories
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let session_repo = Arc::new(PgSessionRepository::new(pool.clone()));
    let verification_repo = Arc::new(PgVerificationTokenRepository::new(pool.clone()));
    let usage_repo = Arc::new(PgUsageRepository::new(pool.clone()));

    // Build service context
    let mut builder = ServiceContextBuilder::new()
        .user_repo(user_repo)
        .session_repo(session_repo)
        .verification_repo(verification_repo)
        .usage_repo(usage_repo)
        .jwt_service(jwt_service)
        .password_service(password_service);

    // OAuth providers are optional; unconfigured ones simply don't register
    if let Some(discord) = &config.oauth.discord {
        builder = builder.oauth_client(Arc::new(DiscordOAuthClient::new(discord)));
        info!("Discord OAuth enabled");
    }
    if let Some(google) = &config.oauth.google {
        builder = builder.oauth_client(Arc::new(GoogleOAuthClient::new(google)));
        info!("Google OAuth enabled");
    }

    builder = match &config.mail {
        Some(mail) => builder.mail_sender(Arc::new(HttpMailSender::new(mail))),
        None => {
            warn!("Mail API not configured; verification codes will only be logged");
            builder.mail_sender(Arc::new(NoopMailSender))
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Start the background task that sweeps expired sessions and verification tokens
pub fn start_expiration_sweeper(state: AppState) -> JoinHandle<()> {
    let interval = Duration::from_secs(state.config().sweep.interval_seconds);

    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);

        loop {
            timer.tick().await;
            run_sweep(&state).await;
        }
    })
}

async fn run_sweep(state: &AppState) {
    debug!("Running expiration sweep");

    let ctx = state.service_context();

    match SessionService::new(ctx).purge_expired().await {
        Ok(count) if count > 0 => debug!(sessions_removed = count, "Expired sessions swept"),
        Err(e) => error!(error = %e, "Failed to sweep expired sessions"),
        _ => {}
    }

    match SignupService::new(ctx).purge_expired().await {
        Ok(count) if count > 0 => {
            debug!(tokens_removed = count, "Expired verification tokens swept");
        }
        Err(e) => error!(error = %e, "Failed to sweep expired verification tokens"),
        _ => {}
    }
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Background sweep for expired sessions and verification tokens
    let _sweeper = start_expiration_sweeper(state.clone());

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
