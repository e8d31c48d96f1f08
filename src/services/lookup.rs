//! Poster lookup: the single entry point for the UI
//!
//! Accepts a free-text title or a streaming URL and runs the whole chain:
//! classify, scrape, normalize, resolve. At most one page fetch happens before
//! the resolver's own TMDB calls.

use tracing::{debug, info};

use super::error::ResolveError;
use super::record::MovieRecord;
use super::resolver::{MovieResolver, NormalizedQuery};
use super::streaming::{ServiceHint, classify};
use super::text_utils::{is_numeric_id, normalize_title};
use super::title_scraper::TitleScraper;

pub const NO_TITLE_IN_URL: &str = "Could not extract title from the provided URL";

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupInput {
    Title(String),
    /// Absolute URL, scheme added if the user left it out
    Url(String),
}

impl LookupInput {
    /// Tell URLs from titles: explicit scheme, or a single token like
    /// "netflix.com/title/81922333"
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else if !trimmed.contains(char::is_whitespace)
            && trimmed.contains('.')
            && trimmed.contains('/')
        {
            Self::Url(format!("https://{}", trimmed))
        } else {
            Self::Title(trimmed.to_string())
        }
    }
}

/// Runs the full resolution pipeline
pub struct PosterLookup {
    scraper: TitleScraper,
    resolver: MovieResolver,
}

impl PosterLookup {
    pub fn new(scraper: TitleScraper, resolver: MovieResolver) -> Self {
        Self { scraper, resolver }
    }

    pub fn resolver(&self) -> &MovieResolver {
        &self.resolver
    }

    pub fn scraper(&self) -> &TitleScraper {
        &self.scraper
    }

    /// Resolve a title or streaming URL to a movie record.
    ///
    /// `hint` is used when the URL's host is not a known service, and as the
    /// service for free-text titles.
    pub async fn lookup(
        &self,
        input: &str,
        hint: Option<ServiceHint>,
    ) -> Result<MovieRecord, ResolveError> {
        if input.trim().is_empty() {
            return Err(ResolveError::InvalidInput(
                "A title or streaming URL is required".to_string(),
            ));
        }
        // Fail before scraping anything
        if !self.resolver.is_configured() {
            return Err(ResolveError::missing_api_key());
        }

        let query = match LookupInput::parse(input) {
            LookupInput::Title(title) => {
                let service = hint.unwrap_or_default();
                NormalizedQuery::new(normalize_title(&title, service), service)
            }
            LookupInput::Url(url) => self.query_from_url(&url, hint).await?,
        };

        info!(query = %query.query, service = %query.service, "Resolving poster lookup");
        self.resolver.resolve(&query).await
    }

    /// Turn a URL into a query: Netflix IDs go straight to the ID lookup,
    /// everything else is scraped, with the path candidate as last resort
    async fn query_from_url(
        &self,
        url: &str,
        hint: Option<ServiceHint>,
    ) -> Result<NormalizedQuery, ResolveError> {
        let classification = classify(url);
        let service = classification
            .service
            .known()
            .or(hint)
            .unwrap_or_default();

        if let Some(candidate) = classification.raw_candidate.as_deref()
            && classification.service == ServiceHint::Netflix
            && is_numeric_id(candidate)
        {
            debug!(url, candidate, "Using Netflix title ID from URL");
            return Ok(NormalizedQuery::new(candidate, service));
        }

        let scraped = self.scraper.scrape(url).await;
        let query = scraped
            .title
            .map(|title| normalize_title(&title, service))
            .filter(|title| !title.is_empty())
            .or_else(|| {
                classification
                    .raw_candidate
                    .map(|candidate| normalize_title(&candidate, service))
                    .filter(|title| !title.is_empty())
            })
            .ok_or_else(|| ResolveError::InvalidInput(NO_TITLE_IN_URL.to_string()))?;

        Ok(NormalizedQuery::new(query, service))
    }
}
