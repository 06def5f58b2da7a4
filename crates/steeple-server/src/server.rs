use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use steeple_directus::{DirectusClient, DirectusError};
use tower_http::trace::TraceLayer;

use crate::{config::AppConfig, handlers};

#[derive(Clone)]
pub struct AppState {
    pub directus: DirectusClient,
    pub bot_active: bool,
}

pub fn build_app(cfg: &AppConfig) -> Result<Router, DirectusError> {
    let state = AppState {
        directus: DirectusClient::new(&cfg.directus.url, cfg.directus.token())?,
        bot_active: cfg.bot.active,
    };
    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/tasks/church", post(handlers::church_task))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(cfg.server.body_limit_bytes))
        .with_state(state))
}

pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = cfg.addr();
    let app = build_app(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, directus = %cfg.directus.url, "steeple-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
