//! TMDB-backed endpoints: title lookup, movie search and browse lists

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::resolve::service_hint;
use crate::AppState;
use crate::services::record::release_year;
use crate::services::tmdb::{PLACEHOLDER_POSTER, TmdbSearchResult, poster_url};
use crate::services::{
    MediaType, MovieRecord, NormalizedQuery, ResolveError, ServiceHint, format_record,
};

const SEARCH_LIMIT: usize = 10;
const FEATURED_LIMIT: usize = 6;

#[derive(Debug, Deserialize)]
pub struct FindByTitleQuery {
    pub title: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    pub page: Option<u32>,
}

/// Search hit as shown in the search dropdown
#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(rename = "posterPath")]
    pub poster_path: Option<String>,
}

/// Poster tile for browse lists
#[derive(Debug, Serialize)]
pub struct PosterCard {
    pub id: u64,
    pub title: String,
    #[serde(rename = "posterPath")]
    pub poster_path: String,
    pub year: String,
}

impl From<&TmdbSearchResult> for PosterCard {
    fn from(movie: &TmdbSearchResult) -> Self {
        Self {
            id: movie.id,
            title: movie.display_title().to_string(),
            poster_path: poster_url(movie.poster_path.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            year: movie
                .release_date
                .as_deref()
                .and_then(release_year)
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub results: Vec<PosterCard>,
    pub page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "totalResults")]
    pub total_results: u32,
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}

fn ensure_configured(state: &AppState) -> Result<(), ApiError> {
    if state.tmdb.has_api_key() {
        Ok(())
    } else {
        Err(ResolveError::missing_api_key().into())
    }
}

/// Movie-only lookup by TMDB ID or title
async fn lookup_movie(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<MovieRecord>, ApiError> {
    let query = required(query.query, "Search query is required")?;
    let record = state.lookup.resolver().resolve_movie(&query).await?;
    Ok(Json(record))
}

/// Resolve an already-extracted title (or Netflix ID) with its service
async fn find_by_title(
    State(state): State<AppState>,
    Query(query): Query<FindByTitleQuery>,
) -> Result<Json<MovieRecord>, ApiError> {
    let title = required(query.title, "Title parameter is required")?;
    let service = service_hint(query.service.as_deref()).unwrap_or(ServiceHint::Unknown);

    let record = state
        .lookup
        .resolver()
        .resolve(&NormalizedQuery::new(title, service))
        .await?;
    Ok(Json(record))
}

/// First page of movie search results
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    let query = required(query.query, "Search query is required")?;
    ensure_configured(&state)?;

    let results = state.tmdb.search(MediaType::Movie, &query, false).await?;
    let summaries = results
        .into_iter()
        .take(SEARCH_LIMIT)
        .map(|movie| MovieSummary {
            id: movie.id,
            title: movie.display_title().to_string(),
            release_date: movie.release_date,
            poster_path: movie.poster_path,
        })
        .collect();

    Ok(Json(summaries))
}

/// Full poster record for a TMDB movie ID
async fn movie_by_id(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MovieRecord>, ApiError> {
    ensure_configured(&state)?;

    let details = state.tmdb.get_details(MediaType::Movie, id).await?;
    details.validate_movie()?;
    Ok(Json(format_record(&details, None)))
}

/// Popular movies, one page at a time
async fn discover(
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<DiscoverResponse>, ApiError> {
    ensure_configured(&state)?;

    let page = state
        .tmdb
        .discover_movies(query.page.unwrap_or(1).max(1))
        .await?;

    Ok(Json(DiscoverResponse {
        results: page.results.iter().map(PosterCard::from).collect(),
        page: page.page,
        total_pages: page.total_pages,
        total_results: page.total_results,
    }))
}

/// A handful of popular movies for the landing page
async fn featured(State(state): State<AppState>) -> Result<Json<Vec<PosterCard>>, ApiError> {
    ensure_configured(&state)?;

    let page = state.tmdb.popular_movies().await?;
    Ok(Json(
        page.results
            .iter()
            .take(FEATURED_LIMIT)
            .map(PosterCard::from)
            .collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lookup_movie))
        .route("/find-by-title", get(find_by_title))
        .route("/search", get(search))
        .route("/movie/{id}", get(movie_by_id))
        .route("/discover", get(discover))
        .route("/featured", get(featured))
}
