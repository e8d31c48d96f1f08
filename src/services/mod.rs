//! Movie metadata resolution pipeline and external service integrations

pub mod error;
pub mod lookup;
pub mod record;
pub mod resolver;
pub mod streaming;
pub mod text_utils;
pub mod title_scraper;
pub mod tmdb;

pub use error::ResolveError;
pub use lookup::{LookupInput, PosterLookup};
pub use record::{MovieRecord, format_record};
pub use resolver::{
    MovieDatabase, MovieResolver, NormalizedQuery, ResolutionPlan, Strategy, StrategyOutcome,
};
pub use streaming::{Classification, ServiceHint, classify, detect_service};
pub use text_utils::normalize_title;
pub use title_scraper::{ScrapedTitle, TitleScraper};
pub use tmdb::{MediaType, TmdbClient};
