//! Resolution endpoints: full lookup plus the individual URL helpers

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::AppState;
use crate::services::lookup::NO_TITLE_IN_URL;
use crate::services::{MovieRecord, ServiceHint, classify, normalize_title};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Free-text title or streaming URL
    pub input: Option<String>,
    /// Optional service name, e.g. "Netflix"
    pub service: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractedTitle {
    pub title: String,
    pub service: ServiceHint,
    pub success: bool,
}

/// Parse an optional service parameter; blank means no hint
pub(crate) fn service_hint(service: Option<&str>) -> Option<ServiceHint> {
    service
        .filter(|s| !s.trim().is_empty())
        .map(ServiceHint::from_name)
        .and_then(ServiceHint::known)
}

fn required_url(query: UrlQuery) -> Result<String, ApiError> {
    query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("URL parameter is required"))
}

/// Resolve a title or URL to a poster record
async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<MovieRecord>, ApiError> {
    let input = query
        .input
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("A title or streaming URL is required"))?;

    let record = state
        .lookup
        .lookup(&input, service_hint(query.service.as_deref()))
        .await?;
    Ok(Json(record))
}

/// Extract an ID or slug from the URL path, without any network access
async fn extract_url(Query(query): Query<UrlQuery>) -> Result<Json<ExtractedTitle>, ApiError> {
    let url = required_url(query)?;
    let classification = classify(&url);

    let title = classification
        .raw_candidate
        .ok_or_else(|| ApiError::bad_request(NO_TITLE_IN_URL))?;

    Ok(Json(ExtractedTitle {
        title,
        service: classification.service,
        success: true,
    }))
}

/// Scrape the page title and clean it up for searching
async fn scrape_title(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<ExtractedTitle>, ApiError> {
    let url = required_url(query)?;
    let scraped = state.lookup.scraper().scrape(&url).await;

    let title = scraped
        .title
        .map(|raw| normalize_title(&raw, scraped.service))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request(NO_TITLE_IN_URL))?;

    Ok(Json(ExtractedTitle {
        title,
        service: scraped.service,
        success: true,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resolve", get(resolve))
        .route("/extract-url", get(extract_url))
        .route("/scrape-title", get(scrape_title))
}
