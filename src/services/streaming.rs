//! Streaming service detection from URLs
//!
//! Maps a streaming page URL to the service it belongs to and pulls a
//! best-guess identifier or title fragment out of the path. Everything here is
//! pure and infallible: bad input yields `ServiceHint::Unknown` and no candidate.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use url::Url;

static NETFLIX_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/title/(\d+)").expect("valid netflix title regex"));

/// Streaming platform a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceHint {
    Netflix,
    AmazonPrime,
    Hulu,
    DisneyPlus,
    Max,
    AppleTV,
    #[default]
    Unknown,
}

impl ServiceHint {
    pub const KNOWN: &[ServiceHint] = &[
        Self::Netflix,
        Self::AmazonPrime,
        Self::Hulu,
        Self::DisneyPlus,
        Self::Max,
        Self::AppleTV,
    ];

    /// Name as the service brands itself in page titles
    pub fn display_name(self) -> Option<&'static str> {
        match self {
            Self::Netflix => Some("Netflix"),
            Self::AmazonPrime => Some("Amazon Prime"),
            Self::Hulu => Some("Hulu"),
            Self::DisneyPlus => Some("Disney+"),
            Self::Max => Some("Max"),
            Self::AppleTV => Some("Apple TV+"),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// Parse a service name as sent by the UI.
    ///
    /// Accepts display names and common spellings, case-insensitive.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '+')
            .collect();

        match key.as_str() {
            "netflix" => Self::Netflix,
            "amazonprime" | "primevideo" | "amazon" | "amazonprimevideo" => Self::AmazonPrime,
            "hulu" => Self::Hulu,
            "disney+" | "disneyplus" | "disney" => Self::DisneyPlus,
            "max" | "hbomax" => Self::Max,
            "appletv+" | "appletv" | "appletvplus" => Self::AppleTV,
            _ => Self::Unknown,
        }
    }

    /// `None` for `Unknown`, so callers can fall back to another hint
    pub fn known(self) -> Option<Self> {
        self.is_known().then_some(self)
    }
}

impl fmt::Display for ServiceHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name().unwrap_or("Unknown"))
    }
}

impl Serialize for ServiceHint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.display_name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_none(),
        }
    }
}

/// Result of classifying a URL
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub service: ServiceHint,
    /// Unvalidated ID or title fragment taken from the path
    pub raw_candidate: Option<String>,
}

/// Detect the streaming service from a hostname.
///
/// Substring rules are checked in priority order and the first match wins.
pub fn detect_service(host: &str) -> ServiceHint {
    let host = host.to_lowercase();

    if host.contains("netflix") {
        ServiceHint::Netflix
    } else if host.contains("amazon") || host.contains("primevideo") {
        ServiceHint::AmazonPrime
    } else if host.contains("hulu") {
        ServiceHint::Hulu
    } else if host.contains("disney") {
        ServiceHint::DisneyPlus
    } else if host.contains("hbomax") || host.contains("max.com") {
        ServiceHint::Max
    } else if host.contains("apple") || host.contains("tv.apple") {
        ServiceHint::AppleTV
    } else {
        ServiceHint::Unknown
    }
}

/// Classify a streaming URL and extract a raw candidate from its path
pub fn classify(url: &str) -> Classification {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return Classification::default();
    };

    let service = parsed.host_str().map(detect_service).unwrap_or_default();
    let raw_candidate =
        extract_candidate(service, parsed.path()).filter(|candidate| !candidate.is_empty());

    Classification {
        service,
        raw_candidate,
    }
}

/// Apply the service's path convention to pull out an ID or slug
fn extract_candidate(service: ServiceHint, path: &str) -> Option<String> {
    // Split like a browser would: "/movies/title/123" -> ["", "movies", "title", "123"]
    let parts: Vec<&str> = path.split('/').collect();

    match service {
        // netflix.com/title/81922333 or netflix.com/id-en/title/81922333
        ServiceHint::Netflix => NETFLIX_TITLE_RE
            .captures(path)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        // primevideo.com/detail/0SSV1CIYHPUKDFUE5JOYRDKF06
        ServiceHint::AmazonPrime if path.contains("/detail/") => last_segment(&parts),
        ServiceHint::AmazonPrime => None,
        // hulu.com/movie/title-12345, play.max.com/movie/12345
        ServiceHint::Hulu | ServiceHint::Max => last_segment(&parts),
        // disneyplus.com/movies/title/12345, tv.apple.com/movie/title/id12345
        ServiceHint::DisneyPlus | ServiceHint::AppleTV => second_to_last_segment(&parts),
        ServiceHint::Unknown => None,
    }
}

fn last_segment(parts: &[&str]) -> Option<String> {
    parts.last().map(|s| s.to_string())
}

fn second_to_last_segment(parts: &[&str]) -> Option<String> {
    if parts.len() > 2 {
        Some(parts[parts.len() - 2].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str) -> Option<String> {
        classify(url).raw_candidate
    }

    #[test]
    fn test_detect_service_all_hosts() {
        let cases = [
            ("www.netflix.com", ServiceHint::Netflix),
            ("www.amazon.com", ServiceHint::AmazonPrime),
            ("www.primevideo.com", ServiceHint::AmazonPrime),
            ("www.hulu.com", ServiceHint::Hulu),
            ("www.disneyplus.com", ServiceHint::DisneyPlus),
            ("play.hbomax.com", ServiceHint::Max),
            ("play.max.com", ServiceHint::Max),
            ("tv.apple.com", ServiceHint::AppleTV),
            ("www.youtube.com", ServiceHint::Unknown),
        ];
        for (host, expected) in cases {
            assert_eq!(detect_service(host), expected, "host {}", host);
        }
    }

    #[test]
    fn test_detect_service_case_insensitive() {
        assert_eq!(detect_service("WWW.NETFLIX.COM"), ServiceHint::Netflix);
        assert_eq!(detect_service("Tv.Apple.Com"), ServiceHint::AppleTV);
    }

    #[test]
    fn test_service_independent_of_path() {
        assert_eq!(classify("https://netflix.com/").service, ServiceHint::Netflix);
        assert_eq!(
            classify("https://www.hulu.com/hub/home?x=1").service,
            ServiceHint::Hulu
        );
    }

    #[test]
    fn test_netflix_title_id() {
        let result = classify("https://netflix.com/title/81922333");
        assert_eq!(result.service, ServiceHint::Netflix);
        assert_eq!(result.raw_candidate.as_deref(), Some("81922333"));

        assert_eq!(
            candidate("https://www.netflix.com/id-en/title/81922333?s=i"),
            Some("81922333".to_string())
        );
        assert_eq!(candidate("https://www.netflix.com/browse"), None);
    }

    #[test]
    fn test_amazon_detail_only() {
        assert_eq!(
            candidate("https://www.primevideo.com/detail/0SSV1CIYHPUKDFUE5JOYRDKF06"),
            Some("0SSV1CIYHPUKDFUE5JOYRDKF06".to_string())
        );
        assert_eq!(candidate("https://www.amazon.com/gp/video/storefront"), None);
    }

    #[test]
    fn test_hulu_and_max_final_segment() {
        assert_eq!(
            candidate("https://www.hulu.com/movie/palm-springs-12345"),
            Some("palm-springs-12345".to_string())
        );
        assert_eq!(
            candidate("https://play.max.com/movie/12345"),
            Some("12345".to_string())
        );
    }

    #[test]
    fn test_trailing_slash_yields_no_candidate() {
        assert_eq!(candidate("https://www.hulu.com/movie/"), None);
    }

    #[test]
    fn test_disney_and_apple_second_to_last() {
        assert_eq!(
            candidate("https://www.disneyplus.com/movies/encanto/33q7DY1rtHQH"),
            Some("encanto".to_string())
        );
        assert_eq!(
            candidate("https://tv.apple.com/us/movie/cha-cha-real-smooth/umc.cmc.123"),
            Some("cha-cha-real-smooth".to_string())
        );
        assert_eq!(candidate("https://www.disneyplus.com/"), None);
    }

    #[test]
    fn test_unknown_and_malformed_never_panic() {
        let unknown = classify("https://www.youtube.com/watch?v=abc");
        assert_eq!(unknown.service, ServiceHint::Unknown);
        assert_eq!(unknown.raw_candidate, None);

        for junk in ["", "not a url", "://", "netflix", "http://"] {
            assert_eq!(classify(junk), Classification::default(), "input {:?}", junk);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ServiceHint::from_name("Amazon Prime"), ServiceHint::AmazonPrime);
        assert_eq!(ServiceHint::from_name("disney+"), ServiceHint::DisneyPlus);
        assert_eq!(ServiceHint::from_name("Apple TV+"), ServiceHint::AppleTV);
        assert_eq!(ServiceHint::from_name("HBO Max"), ServiceHint::Max);
        assert_eq!(ServiceHint::from_name(""), ServiceHint::Unknown);
        assert_eq!(ServiceHint::from_name("Crunchyroll"), ServiceHint::Unknown);

        for service in ServiceHint::KNOWN {
            let name = service.display_name().unwrap();
            assert_eq!(ServiceHint::from_name(name), *service);
        }
    }

    #[test]
    fn test_serializes_display_name_or_null() {
        assert_eq!(
            serde_json::to_value(ServiceHint::DisneyPlus).unwrap(),
            serde_json::json!("Disney+")
        );
        assert_eq!(
            serde_json::to_value(ServiceHint::Unknown).unwrap(),
            serde_json::Value::Null
        );
    }
}
