//! TMDB (The Movie Database) API client for movie and TV metadata
//!
//! TMDB is a popular movie/TV database with a free API.
//! Base URL: https://api.themoviedb.org/3
//!
//! Every request is a single attempt. Responses are checked in the same order
//! the web UI relied on: content type first (an HTML error page usually means a
//! bad key or proxy), then status, then the JSON schema.

use std::fmt;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::ResolveError;
use crate::config::Config;

/// Base for w500 poster images
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Shown by the UI when a movie has no poster
pub const PLACEHOLDER_POSTER: &str = "/placeholder.svg?height=450&width=300&text=No+Image";

/// TMDB API client
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Movie or TV show, as TMDB splits its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// A page of results from search, discover and popular endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// One search hit. Movies carry `title`, TV shows carry `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbSearchResult {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub media_type: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

impl TmdbSearchResult {
    /// Infer the media type: a `name` field is typical of TV entries
    pub fn inferred_media_type(&self) -> MediaType {
        if self.media_type.as_deref() == Some("tv") || self.name.is_some() {
            MediaType::Tv
        } else {
            MediaType::Movie
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Response of `find/{external_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbFindResult {
    #[serde(default)]
    pub movie_results: Vec<TmdbSearchResult>,
    #[serde(default)]
    pub tv_results: Vec<TmdbSearchResult>,
    #[serde(default)]
    pub tv_episode_results: Vec<serde_json::Value>,
    #[serde(default)]
    pub tv_season_results: Vec<serde_json::Value>,
}

impl TmdbFindResult {
    pub fn is_empty(&self) -> bool {
        self.movie_results.is_empty()
            && self.tv_results.is_empty()
            && self.tv_episode_results.is_empty()
            && self.tv_season_results.is_empty()
    }

    /// First movie hit, else first TV hit, tagged with its media type
    pub fn best_match(&self) -> Option<(u64, MediaType)> {
        self.movie_results
            .first()
            .map(|m| (m.id, MediaType::Movie))
            .or_else(|| self.tv_results.first().map(|t| (t.id, MediaType::Tv)))
    }
}

/// Movie or TV details with embedded credits (`append_to_response=credits`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbDetails {
    #[serde(default)]
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub original_name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub poster_path: Option<String>,
    pub credits: Option<TmdbCredits>,
}

impl TmdbDetails {
    /// Check the fields a movie poster cannot do without
    pub fn validate_movie(&self) -> Result<(), ResolveError> {
        let has = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());

        if !has(&self.title)
            || !has(&self.release_date)
            || self.runtime.is_none_or(|r| r == 0)
            || self.credits.is_none()
        {
            return Err(ResolveError::format(
                format!("movie/{}", self.id),
                "Invalid movie data format from TMDB API",
            ));
        }
        Ok(())
    }
}

/// Credits from TMDB
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
    pub character: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
    pub department: Option<String>,
}

/// Error body TMDB sends with non-success statuses
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

impl TmdbClient {
    /// Create a new TMDB client from the application config
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.tmdb_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.tmdb_base_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    /// Check if the client has an API key configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Search for movies or TV shows by title
    pub async fn search(
        &self,
        media_type: MediaType,
        query: &str,
        include_adult: bool,
    ) -> Result<Vec<TmdbSearchResult>, ResolveError> {
        info!(media_type = %media_type, query, "Searching TMDB");

        let endpoint = format!("search/{}", media_type.as_path());
        let page: TmdbPage<TmdbSearchResult> = self
            .get_json(
                &endpoint,
                &[
                    ("query", query.to_string()),
                    ("include_adult", include_adult.to_string()),
                ],
            )
            .await?;

        debug!(count = page.results.len(), "TMDB search returned results");
        Ok(page.results)
    }

    /// Get movie or TV details with credits
    pub async fn get_details(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<TmdbDetails, ResolveError> {
        debug!(media_type = %media_type, id, "Fetching details from TMDB");

        let endpoint = format!("{}/{}", media_type.as_path(), id);
        self.get_json(&endpoint, &[("append_to_response", "credits".to_string())])
            .await
    }

    /// Find movies/shows by an ID from another source
    pub async fn find_by_external_id(
        &self,
        external_id: &str,
        external_source: &str,
    ) -> Result<TmdbFindResult, ResolveError> {
        debug!(external_id, external_source, "Looking up external ID on TMDB");

        let endpoint = format!("find/{}", external_id);
        self.get_json(&endpoint, &[("external_source", external_source.to_string())])
            .await
    }

    /// Popular movies, most popular first
    pub async fn discover_movies(
        &self,
        page: u32,
    ) -> Result<TmdbPage<TmdbSearchResult>, ResolveError> {
        self.get_json(
            "discover/movie",
            &[
                ("language", "en-US".to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("include_adult", "false".to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    /// TMDB's current popular movie list
    pub async fn popular_movies(&self) -> Result<TmdbPage<TmdbSearchResult>, ResolveError> {
        self.get_json(
            "movie/popular",
            &[("language", "en-US".to_string()), ("page", "1".to_string())],
        )
        .await
    }

    /// Issue one GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ResolveError> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ResolveError::missing_api_key()),
        };

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await
            .map_err(|source| ResolveError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));

        if !is_json {
            warn!(endpoint, status = status.as_u16(), "TMDB returned a non-JSON response");
            return Err(ResolveError::format(
                endpoint,
                "Invalid API response. Please check your TMDB API key configuration.",
            ));
        }

        let body = response.bytes().await.map_err(|source| ResolveError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<TmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(endpoint, status = status.as_u16(), message = %message, "TMDB request failed");
            return Err(ResolveError::UpstreamHttp {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(endpoint, error = %e, "Failed to parse TMDB response");
            ResolveError::format(endpoint, format!("Failed to parse TMDB response: {}", e))
        })
    }
}

/// Absolute w500 poster URL, or `None` when the path is missing
pub fn poster_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", TMDB_IMAGE_BASE_URL, p))
}
