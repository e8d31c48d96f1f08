//! Normalized movie record consumed by the poster renderer

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::streaming::ServiceHint;
use super::tmdb::{TmdbDetails, poster_url};

/// Placeholder for empty name lists
pub const UNKNOWN: &str = "Unknown";

pub const MAX_PRODUCERS: usize = 3;
pub const MAX_STARRING: usize = 9;

/// Poster-ready movie or show metadata.
///
/// Every field is always present; missing data is an empty string or
/// "Unknown", never an omitted key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    pub title: String,
    pub original_title: Option<String>,
    pub year: String,
    #[serde(rename = "runningTime")]
    pub running_time: String,
    pub director: String,
    #[serde(rename = "producedBy")]
    pub produced_by: String,
    pub starring: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub service: Option<ServiceHint>,
}

/// Map a TMDB detail payload to a `MovieRecord`
pub fn format_record(details: &TmdbDetails, service: Option<ServiceHint>) -> MovieRecord {
    let credits = details.credits.clone().unwrap_or_default();

    let directors = credits
        .crew
        .iter()
        .filter(|c| c.job == "Director")
        .map(|c| c.name.as_str());
    let producers = credits
        .crew
        .iter()
        .filter(|c| c.job == "Producer")
        .map(|c| c.name.as_str())
        .take(MAX_PRODUCERS);
    let starring = credits
        .cast
        .iter()
        .map(|c| c.name.as_str())
        .take(MAX_STARRING);

    let running_time = details
        .runtime
        .filter(|r| *r > 0)
        .or_else(|| details.episode_run_time.first().copied().filter(|r| *r > 0))
        .map(|minutes| format!("{} MINUTES", minutes))
        .unwrap_or_default();

    MovieRecord {
        title: non_empty(&details.title)
            .or(non_empty(&details.name))
            .unwrap_or_default()
            .to_string(),
        original_title: non_empty(&details.original_title)
            .or(non_empty(&details.original_name))
            .map(str::to_string),
        year: non_empty(&details.release_date)
            .or(non_empty(&details.first_air_date))
            .and_then(release_year)
            .unwrap_or_default(),
        running_time,
        director: join_names(directors),
        produced_by: join_names(producers),
        starring: join_names(starring),
        image_url: poster_url(details.poster_path.as_deref()).unwrap_or_default(),
        service,
    }
}

/// Four-digit year of a TMDB date ("1999-03-30" -> "1999")
pub fn release_year(date: &str) -> Option<String> {
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(format!("{:04}", parsed.year()));
    }

    // Partial dates ("1999", "1999-03") still carry a usable year
    let head: String = date.chars().take(4).collect();
    (head.len() == 4 && head.bytes().all(|b| b.is_ascii_digit())).then_some(head)
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        UNKNOWN.to_string()
    } else {
        joined
    }
}
