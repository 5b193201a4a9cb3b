//! GymDesk: a gym-management web service.
//!
//! One binary serves three surfaces from the same in-process store: a REST
//! CRUD API under `/rest` guarded by bearer tokens, server-rendered pages
//! with session-cookie sign-in, and operational endpoints (`/health`,
//! `/ready`, `/metrics`).

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod pages;
pub mod state;
pub mod store;
pub mod validate;

pub use config::{CliArgs, ServerConfig};
pub use error::AppError;
pub use logging::{LoggingConfig, init_logging};
pub use state::AppState;

use anyhow::{Context, Result};
use axum::Router;
use axum::middleware;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::identity::NewUser;

/// Assembles the full application router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(pages::routes())
        .nest("/rest", api::routes())
        .route("/health", get(health::liveness_handler))
        .route("/ready", get(health::readiness_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(middleware::from_fn(metrics::track_http))
        .with_state(state)
}

/// Provisions the configured bootstrap superuser, if any. Idempotent in the
/// sense that it only runs against a fresh directory at startup.
pub fn bootstrap_admin(state: &AppState) -> Result<()> {
    let config = state.config();
    let (Some(username), Some(password)) =
        (config.admin_username.as_ref(), config.admin_password.as_ref())
    else {
        return Ok(());
    };
    let mut directory = state.directory_mut();
    let admin_id = directory
        .create_user(NewUser {
            username: username.clone(),
            password: password.clone(),
            is_superuser: true,
            ..NewUser::default()
        })
        .with_context(|| format!("failed to provision admin {username:?}"))?;
    if let Some(token) = config.admin_token.as_ref() {
        directory
            .register_token(token, admin_id)
            .context("failed to register admin token")?;
    }
    tracing::info!(%username, "bootstrap admin provisioned");
    Ok(())
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let bind_address = config.bind_address;
    let state = Arc::new(AppState::new(Arc::new(config)));
    bootstrap_admin(&state)?;
    let app = build_router(state);

    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    tracing::info!(%bind_address, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
