//! Title cleanup for scraped and user-supplied titles
//!
//! Streaming pages decorate titles with calls to action ("Watch ...") and
//! branding suffixes ("... | Netflix"). These helpers reduce such strings to
//! something a search API can match.

use once_cell::sync::Lazy;
use regex::Regex;

use super::streaming::ServiceHint;

static VERB_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(watch|stream|ver)\s+").expect("valid verb prefix regex"));

/// Characters removed from the end of a title after suffix stripping
const TRAILING_JUNK: &[char] = &['-', '|', ':'];

/// Normalize a raw title for searching.
///
/// Strips a leading "Watch"/"Stream"/"Ver", trailing service branding in its
/// usual variants, and leftover separators. Steps repeat until the string
/// stops changing, so the result is stable under another pass.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_title("Watch Inception | Netflix", ServiceHint::Netflix), "Inception");
/// ```
pub fn normalize_title(raw: &str, service: ServiceHint) -> String {
    let suffixes = service_suffixes(service);
    let mut current = raw.trim().to_string();

    loop {
        let next = clean_pass(&current, &suffixes);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_pass(title: &str, suffixes: &[String]) -> String {
    let mut title = VERB_PREFIX_RE.replace(title, "").into_owned();

    for suffix in suffixes {
        if let Some(stripped) = strip_suffix_ignore_case(&title, suffix) {
            title = stripped.trim().to_string();
        }
    }

    title
        .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_JUNK.contains(&c))
        .trim()
        .to_string()
}

/// Branding variants for a service, in the order they are tried
fn service_suffixes(service: ServiceHint) -> Vec<String> {
    let Some(name) = service.display_name() else {
        return Vec::new();
    };

    vec![
        format!("| {}", name),
        format!("- {}", name),
        format!("| Watch on {}", name),
        format!("| Stream on {}", name),
        format!("({})", name),
        format!("on {}", name),
    ]
}

/// Case-insensitive (ASCII) `strip_suffix`
fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(cut) {
        return None;
    }
    let (head, tail) = s.split_at(cut);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Turn a URL slug into a readable title: "the-dark-knight" -> "The dark knight"
pub fn title_from_slug(slug: &str) -> String {
    let spaced = slug.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether a query is a bare numeric ID such as a Netflix title ID
pub fn is_numeric_id(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_netflix_title() {
        assert_eq!(
            normalize_title("Watch Inception | Netflix", ServiceHint::Netflix),
            "Inception"
        );
    }

    #[test]
    fn test_normalize_amazon_parenthesized() {
        assert_eq!(
            normalize_title("Stream The Boys (Amazon Prime)", ServiceHint::AmazonPrime),
            "The Boys"
        );
    }

    #[test]
    fn test_normalize_watch_on_variant() {
        assert_eq!(
            normalize_title("Encanto | Watch on Disney+", ServiceHint::DisneyPlus),
            "Encanto"
        );
        assert_eq!(
            normalize_title("Severance | Stream on Apple TV+", ServiceHint::AppleTV),
            "Severance"
        );
        assert_eq!(
            normalize_title("Dune: Part Two - max", ServiceHint::Max),
            "Dune: Part Two"
        );
    }

    #[test]
    fn test_normalize_compounded_suffixes() {
        assert_eq!(
            normalize_title("Palm Springs - Hulu | Hulu", ServiceHint::Hulu),
            "Palm Springs"
        );
        assert_eq!(
            normalize_title("Ver The Crown | Netflix |", ServiceHint::Netflix),
            "The Crown"
        );
    }

    #[test]
    fn test_unknown_service_keeps_branding() {
        assert_eq!(
            normalize_title("Watch Inception | Netflix", ServiceHint::Unknown),
            "Inception | Netflix"
        );
    }

    #[test]
    fn test_prefix_needs_word_boundary() {
        assert_eq!(normalize_title("Watchmen", ServiceHint::Unknown), "Watchmen");
        assert_eq!(normalize_title("Vertigo", ServiceHint::Unknown), "Vertigo");
        assert_eq!(normalize_title("Stream", ServiceHint::Unknown), "Stream");
        assert_eq!(
            normalize_title("WatchInception", ServiceHint::Unknown),
            "WatchInception"
        );
        assert_eq!(normalize_title("ver  Roma", ServiceHint::Unknown), "Roma");
    }

    #[test]
    fn test_trailing_punctuation_trimmed() {
        assert_eq!(normalize_title("Alien: ", ServiceHint::Unknown), "Alien");
        assert_eq!(normalize_title("Heat -|:", ServiceHint::Unknown), "Heat");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_title("", ServiceHint::Netflix), "");
        assert_eq!(normalize_title("   ", ServiceHint::Unknown), "");
        assert_eq!(normalize_title("| Netflix", ServiceHint::Netflix), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            ("Watch Watch Dogs | Netflix", ServiceHint::Netflix),
            ("Stream The Boys (Amazon Prime)", ServiceHint::AmazonPrime),
            ("X - Netflix |", ServiceHint::Netflix),
            ("Ver Roma on Netflix", ServiceHint::Netflix),
            ("Frieren: Beyond Journey\u{2019}s End \u{2013} Hulu", ServiceHint::Hulu),
            ("Just A Title", ServiceHint::Unknown),
        ];
        for (input, service) in inputs {
            let once = normalize_title(input, service);
            let twice = normalize_title(&once, service);
            assert_eq!(once, twice, "input {:?}", input);
        }
    }

    #[test]
    fn test_strip_suffix_ignore_case_multibyte() {
        assert_eq!(strip_suffix_ignore_case("Amélie | NETFLIX", "| Netflix"), Some("Amélie "));
        assert_eq!(strip_suffix_ignore_case("é", "ab"), None);
        assert_eq!(strip_suffix_ignore_case("", "| Netflix"), None);
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("the-dark-knight"), "The dark knight");
        assert_eq!(title_from_slug("élite"), "Élite");
        assert_eq!(title_from_slug(""), "");
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("81922333"));
        assert!(!is_numeric_id("8192a333"));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("0SSV1CIYHPUKDFUE5JOYRDKF06"));
    }
}
