//! Application configuration management

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default TMDB API root
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// TMDB API key. Missing keys are reported per request, not at startup.
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL (overridable for testing against a mock server)
    pub tmdb_base_url: String,

    /// Timeout for each TMDB request
    pub tmdb_timeout: Duration,

    /// Timeout for fetching a streaming page
    pub scrape_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            port: 3001,
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            tmdb_timeout: Duration::from_secs(15),
            scrape_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("Invalid PORT")?,

            // An empty value counts as unset
            tmdb_api_key: env::var("TMDB_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),

            tmdb_base_url: env::var("TMDB_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.tmdb_base_url),

            tmdb_timeout: secs_var("TMDB_TIMEOUT_SECS", defaults.tmdb_timeout)?,

            scrape_timeout: secs_var("SCRAPE_TIMEOUT_SECS", defaults.scrape_timeout)?,
        })
    }

    /// Configuration pointing at a specific TMDB endpoint
    pub fn with_tmdb(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            tmdb_api_key: api_key.map(str::to_string),
            tmdb_base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn has_tmdb_api_key(&self) -> bool {
        self.tmdb_api_key.is_some()
    }
}

fn secs_var(name: &str, default: Duration) -> Result<Duration> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("Invalid {}", name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.tmdb_base_url, DEFAULT_TMDB_BASE_URL);
        assert!(!config.has_tmdb_api_key());
    }

    #[test]
    fn test_with_tmdb_trims_trailing_slash() {
        let config = Config::with_tmdb(Some("key"), "http://127.0.0.1:9999/");
        assert_eq!(config.tmdb_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.tmdb_api_key.as_deref(), Some("key"));
    }
}
