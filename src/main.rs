//! Polaroid backend - movie metadata API for the poster generator
//!
//! Resolves titles and streaming URLs through TMDB. Endpoints live under /api.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polaroid::config::Config;
use polaroid::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polaroid=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Polaroid backend");
    tracing::info!(tmdb_base_url = %config.tmdb_base_url, "Configuration loaded");

    if !config.has_tmdb_api_key() {
        tracing::warn!("TMDB_API_KEY is not set - lookups will fail until it is configured");
    }

    let port = config.port;
    let public_host = config.host.clone();
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);
    if let Some(host) = public_host {
        tracing::info!("Public URL: http://{}:{}/api", host, port);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
