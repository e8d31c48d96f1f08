//! Polaroid backend - movie metadata resolution for the poster generator
//!
//! Turns a movie title or a streaming-service URL into a normalized
//! [`MovieRecord`](services::MovieRecord) that the UI renders as a polaroid
//! poster. The REST API lives under `/api`.

pub mod api;
pub mod config;
pub mod services;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{MovieResolver, PosterLookup, TitleScraper, TmdbClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
    pub lookup: Arc<PosterLookup>,
}

impl AppState {
    /// Build the HTTP clients and the pipeline from configuration
    pub fn from_config(config: Config) -> reqwest::Result<Self> {
        let tmdb = Arc::new(TmdbClient::new(&config)?);
        let scraper = TitleScraper::new(&config)?;
        let resolver = MovieResolver::new(tmdb.clone());

        Ok(Self {
            config: Arc::new(config),
            tmdb,
            lookup: Arc::new(PosterLookup::new(scraper, resolver)),
        })
    }
}

/// Build the router with all endpoints and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .merge(api::health::router())
        // REST API endpoints
        .nest("/api", api::resolve::router())
        .nest("/api/tmdb", api::tmdb::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
