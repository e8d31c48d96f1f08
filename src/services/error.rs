//! Error taxonomy for movie resolution

use thiserror::Error;

/// Errors surfaced by the resolution pipeline.
///
/// Classifier and normalizer never fail, and scrape failures are recovered
/// inside the scraper, so only the resolver boundaries produce these.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Operator error: a required credential is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Upstream returned a body that is not JSON or does not match the schema.
    #[error("invalid response from {endpoint}: {message}")]
    UpstreamFormat { endpoint: String, message: String },

    /// Upstream returned a non-success status.
    #[error("TMDB API error (status {status}): {message}")]
    UpstreamHttp {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Every strategy ran without a match.
    #[error("{0}")]
    NotFound(String),

    /// Transport failure or timeout at a fatal boundary.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    InvalidInput(String),
}

impl ResolveError {
    pub fn missing_api_key() -> Self {
        Self::Configuration("TMDB API key is not configured".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn format(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamFormat {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Whether this is the expected outcome for bad user input rather than a system fault
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidInput(_))
    }
}
