//! Movie resolution: from a normalized query to a poster-ready record
//!
//! The fallback chain is an ordered list of strategies. Each one either
//! matches a candidate, falls through to the next, or fails the whole
//! resolution. A small driver walks the plan; the winning candidate's details
//! are then fetched and formatted.
//!
//! Selection is deliberately naive: the first result of the first non-empty
//! search wins. Common titles can therefore resolve to the wrong entry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::ResolveError;
use super::record::{MovieRecord, format_record};
use super::streaming::ServiceHint;
use super::text_utils::is_numeric_id;
use super::tmdb::{MediaType, TmdbClient, TmdbDetails, TmdbFindResult, TmdbSearchResult};

/// External source used for the ID lookup branch
pub const EXTERNAL_ID_SOURCE: &str = "imdb_id";

pub const TITLE_NOT_FOUND: &str = "No content found with this title";
pub const MOVIE_NOT_FOUND: &str = "No movies found matching your search";

/// Read-only movie database the resolver queries
#[async_trait]
pub trait MovieDatabase: Send + Sync {
    /// Whether credentials are present; checked before any request
    fn is_configured(&self) -> bool;

    async fn find_by_external_id(
        &self,
        external_id: &str,
        external_source: &str,
    ) -> Result<TmdbFindResult, ResolveError>;

    async fn search(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<TmdbSearchResult>, ResolveError>;

    async fn details(&self, media_type: MediaType, id: u64) -> Result<TmdbDetails, ResolveError>;
}

#[async_trait]
impl MovieDatabase for TmdbClient {
    fn is_configured(&self) -> bool {
        self.has_api_key()
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
        external_source: &str,
    ) -> Result<TmdbFindResult, ResolveError> {
        TmdbClient::find_by_external_id(self, external_id, external_source).await
    }

    async fn search(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<TmdbSearchResult>, ResolveError> {
        TmdbClient::search(self, media_type, query, true).await
    }

    async fn details(&self, media_type: MediaType, id: u64) -> Result<TmdbDetails, ResolveError> {
        self.get_details(media_type, id).await
    }
}

/// Cleaned search string plus the service it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub query: String,
    pub service: ServiceHint,
}

impl NormalizedQuery {
    pub fn new(query: impl Into<String>, service: ServiceHint) -> Self {
        Self {
            query: query.into(),
            service,
        }
    }
}

/// One step of the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Look the query up as an external ID
    ExternalIdLookup,
    /// Treat the query as a TMDB movie ID
    DirectMovieId,
    MovieSearch,
    TvSearch,
}

/// Candidate accepted by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub media_type: MediaType,
}

/// What a strategy reports back to the driver
#[derive(Debug)]
pub enum StrategyOutcome {
    Matched(Candidate),
    FallThrough,
    Fatal(ResolveError),
}

/// Ordered strategies plus the message used when all of them fall through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    pub strategies: Vec<Strategy>,
    pub not_found_message: &'static str,
}

impl ResolutionPlan {
    /// Title plan: ID lookup (Netflix numeric IDs only), movie search, TV search
    pub fn for_query(query: &NormalizedQuery) -> Self {
        let mut strategies = Vec::with_capacity(3);
        if query.service == ServiceHint::Netflix && is_numeric_id(&query.query) {
            strategies.push(Strategy::ExternalIdLookup);
        }
        strategies.extend([Strategy::MovieSearch, Strategy::TvSearch]);

        Self {
            strategies,
            not_found_message: TITLE_NOT_FOUND,
        }
    }

    /// Movie-only plan: numeric queries are TMDB movie IDs, everything else is searched
    pub fn for_movie_lookup(query: &str) -> Self {
        let strategy = if is_numeric_id(query) {
            Strategy::DirectMovieId
        } else {
            Strategy::MovieSearch
        };

        Self {
            strategies: vec![strategy],
            not_found_message: MOVIE_NOT_FOUND,
        }
    }
}

/// Resolves queries against a movie database
#[derive(Clone)]
pub struct MovieResolver {
    db: Arc<dyn MovieDatabase>,
}

impl MovieResolver {
    pub fn new(db: Arc<dyn MovieDatabase>) -> Self {
        Self { db }
    }

    pub fn is_configured(&self) -> bool {
        self.db.is_configured()
    }

    /// Resolve a title (or Netflix ID) to a movie record
    pub async fn resolve(&self, query: &NormalizedQuery) -> Result<MovieRecord, ResolveError> {
        let plan = ResolutionPlan::for_query(query);
        self.resolve_with_plan(query, &plan).await
    }

    /// Resolve a movie by TMDB ID or title, never falling back to TV
    pub async fn resolve_movie(&self, query: &str) -> Result<MovieRecord, ResolveError> {
        let query = NormalizedQuery::new(query.trim(), ServiceHint::Unknown);
        let plan = ResolutionPlan::for_movie_lookup(&query.query);
        self.resolve_with_plan(&query, &plan).await
    }

    /// Run a plan, then fetch and format the winning candidate
    pub async fn resolve_with_plan(
        &self,
        query: &NormalizedQuery,
        plan: &ResolutionPlan,
    ) -> Result<MovieRecord, ResolveError> {
        if !self.db.is_configured() {
            return Err(ResolveError::missing_api_key());
        }
        if query.query.trim().is_empty() {
            return Err(ResolveError::InvalidInput(
                "Search query is required".to_string(),
            ));
        }

        let candidate = self.select_candidate(query, plan).await?;
        info!(
            query = %query.query,
            id = candidate.id,
            media_type = %candidate.media_type,
            "Resolved candidate"
        );

        let details = self.db.details(candidate.media_type, candidate.id).await?;
        Ok(format_record(&details, query.service.known()))
    }

    /// Driver loop: first `Matched` wins, first `Fatal` aborts
    pub async fn select_candidate(
        &self,
        query: &NormalizedQuery,
        plan: &ResolutionPlan,
    ) -> Result<Candidate, ResolveError> {
        for strategy in &plan.strategies {
            match self.run_strategy(*strategy, query).await {
                StrategyOutcome::Matched(candidate) => return Ok(candidate),
                StrategyOutcome::FallThrough => {
                    debug!(?strategy, query = %query.query, "Strategy fell through");
                }
                StrategyOutcome::Fatal(err) => return Err(err),
            }
        }

        Err(ResolveError::not_found(plan.not_found_message))
    }

    async fn run_strategy(&self, strategy: Strategy, query: &NormalizedQuery) -> StrategyOutcome {
        match strategy {
            Strategy::ExternalIdLookup => self.lookup_external_id(&query.query).await,
            Strategy::DirectMovieId => match query.query.parse::<u64>() {
                Ok(id) => StrategyOutcome::Matched(Candidate {
                    id,
                    media_type: MediaType::Movie,
                }),
                Err(_) => StrategyOutcome::FallThrough,
            },
            Strategy::MovieSearch => self.search_first(MediaType::Movie, &query.query).await,
            Strategy::TvSearch => self.search_first(MediaType::Tv, &query.query).await,
        }
    }

    /// Any failure here only means "try searching instead"
    async fn lookup_external_id(&self, external_id: &str) -> StrategyOutcome {
        match self
            .db
            .find_by_external_id(external_id, EXTERNAL_ID_SOURCE)
            .await
        {
            Ok(found) => match found.best_match() {
                Some((id, media_type)) => StrategyOutcome::Matched(Candidate { id, media_type }),
                None => StrategyOutcome::FallThrough,
            },
            Err(e) => {
                warn!(external_id, error = %e, "External ID lookup failed, falling back to search");
                StrategyOutcome::FallThrough
            }
        }
    }

    async fn search_first(&self, media_type: MediaType, query: &str) -> StrategyOutcome {
        match self.db.search(media_type, query).await {
            Ok(results) => match results.first() {
                Some(first) => {
                    debug!(
                        media_type = %media_type,
                        id = first.id,
                        title = first.display_title(),
                        total = results.len(),
                        "Taking first search result"
                    );
                    StrategyOutcome::Matched(Candidate {
                        id: first.id,
                        media_type: first.inferred_media_type(),
                    })
                }
                None => StrategyOutcome::FallThrough,
            },
            Err(e) => StrategyOutcome::Fatal(e),
        }
    }
}
