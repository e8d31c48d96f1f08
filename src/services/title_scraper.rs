//! Page title scraping for streaming URLs
//!
//! Fetches the page once with browser-like headers (several services serve
//! different markup, or nothing, to non-browser clients) and pulls a title out
//! of the usual metadata tags. Scraping is best effort: failures are logged and
//! replaced by a title guessed from the URL path.

use once_cell::sync::Lazy;
use reqwest::{Client, header};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::streaming::{ServiceHint, detect_service};
use super::text_utils::title_from_slug;
use crate::config::Config;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static TWITTER_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="twitter:title"]"#));
static TITLE_TAG: Lazy<Selector> = Lazy::new(|| selector("title"));
static AMAZON_TITLE: Lazy<Selector> =
    Lazy::new(|| selector(r#"h1[data-automation-id="title"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Why a scrape produced no title. Never surfaced past the scraper.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("page returned status {0}")]
    Status(u16),

    #[error("no title found in page")]
    NoTitle,
}

/// Outcome of scraping a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedTitle {
    /// Raw title, not yet normalized
    pub title: Option<String>,
    pub service: ServiceHint,
}

/// Fetches streaming pages and extracts their titles
pub struct TitleScraper {
    client: Client,
}

impl TitleScraper {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(BROWSER_USER_AGENT),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(BROWSER_ACCEPT),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.scrape_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Scrape a title, falling back to the URL path when the page gives nothing
    pub async fn scrape(&self, url: &str) -> ScrapedTitle {
        let service = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(detect_service))
            .unwrap_or_default();

        info!(url, service = %service, "Attempting to scrape title");

        let title = match self.fetch_title(url, service).await {
            Ok(title) => {
                debug!(url, title = %title, "Raw extracted title");
                Some(title)
            }
            Err(e) => {
                warn!(url, error = %e, "Scraping failed, falling back to URL path");
                title_from_path(url)
            }
        };

        ScrapedTitle { title, service }
    }

    async fn fetch_title(&self, url: &str, service: ServiceHint) -> Result<String, ScrapeError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        extract_title(&html, service).ok_or(ScrapeError::NoTitle)
    }
}

/// Extract a title from HTML.
///
/// Order: og:title, twitter:title, `<title>`, then selectors specific to the
/// service. The first non-empty value wins.
pub fn extract_title(html: &str, service: ServiceHint) -> Option<String> {
    let document = Html::parse_document(html);

    let meta = |sel: &Selector| {
        document
            .select(sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    };
    let text = |sel: &Selector| {
        document
            .select(sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    };

    meta(&OG_TITLE)
        .or_else(|| meta(&TWITTER_TITLE))
        .or_else(|| text(&TITLE_TAG))
        .or_else(|| match service {
            ServiceHint::AmazonPrime => text(&AMAZON_TITLE),
            _ => None,
        })
}

/// Guess a title from the last path segment: "/movie/palm-springs" -> "Palm springs"
pub fn title_from_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path().split('/').rfind(|s| !s.is_empty())?;
    let title = title_from_slug(last);
    (!title.trim().is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_title_wins() {
        let html = r#"
            <html><head>
                <title>Page Title</title>
                <meta name="twitter:title" content="Twitter Title">
                <meta property="og:title" content="The Matrix | Netflix">
            </head></html>
        "#;
        assert_eq!(
            extract_title(html, ServiceHint::Netflix).as_deref(),
            Some("The Matrix | Netflix")
        );
    }

    #[test]
    fn test_twitter_then_title_tag() {
        let twitter = r#"<html><head><meta name="twitter:title" content="Tw"><title>T</title></head></html>"#;
        assert_eq!(extract_title(twitter, ServiceHint::Unknown).as_deref(), Some("Tw"));

        let title_only = r#"<html><head><meta property="og:title" content="  "><title> Heat </title></head></html>"#;
        assert_eq!(extract_title(title_only, ServiceHint::Unknown).as_deref(), Some("Heat"));
    }

    #[test]
    fn test_amazon_heading_fallback() {
        let html = r#"<html><body><h1 data-automation-id="title">The Boys</h1></body></html>"#;
        assert_eq!(
            extract_title(html, ServiceHint::AmazonPrime).as_deref(),
            Some("The Boys")
        );
        assert_eq!(extract_title(html, ServiceHint::Netflix), None);
    }

    #[test]
    fn test_garbage_html() {
        assert_eq!(extract_title("", ServiceHint::Unknown), None);
        assert_eq!(extract_title("<<<not html", ServiceHint::Unknown), None);
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(
            title_from_path("https://www.hulu.com/movie/palm-springs").as_deref(),
            Some("Palm springs")
        );
        assert_eq!(
            title_from_path("https://www.hulu.com/movie/palm-springs/").as_deref(),
            Some("Palm springs")
        );
        assert_eq!(title_from_path("https://www.hulu.com/"), None);
        assert_eq!(title_from_path("not a url"), None);
    }

    #[tokio::test]
    async fn test_invalid_url_yields_nothing() {
        let scraper = TitleScraper::new(&Config::default()).unwrap();
        let scraped = scraper.scrape("not a url").await;
        assert_eq!(
            scraped,
            ScrapedTitle {
                title: None,
                service: ServiceHint::Unknown
            }
        );
    }
}
