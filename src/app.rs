/*
 * Responsibility
 * - Load Config -> build collaborators -> assemble the Router
 * - Apply HTTP middleware (request id, trace, limits)
 * - Serve with axum::serve()
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::http::{self, HttpLimits};
use crate::services::{AccountDirectory, build_auth_filter};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,jwt_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing so they are not lost with stderr.
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // Any missing value stops here, before a socket is bound.
    let config = Config::from_env().context("invalid configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting jwt-gate in {:?} mode on {} (service: {})",
        config.app_env,
        config.addr,
        config.filter.service_name()
    );

    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let auth = build_auth_filter(config, AccountDirectory::with_demo_accounts())
        .context("failed to initialize authentication filter")?;

    Ok(AppState::new(auth))
}

pub fn build_router(state: AppState) -> Router {
    async fn root_health() -> &'static str {
        "ok"
    }

    let router = Router::new()
        .route("/health", get(root_health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    http::apply(router, HttpLimits::default())
}
