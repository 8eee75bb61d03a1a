//! Normalised request parameters passed from the gateway to providers.

use serde::{Deserialize, Deserializer, Serialize};

use super::vocabulary::{Genre, MediaSort, Season};

/// Default page number when the request omits one.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when the request omits one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Pagination window.
///
/// Defaults are applied before cache keys are built, so `?page=1` and an
/// omitted page share a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
}

impl Page {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Episode listing options shared by the episodes and info operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EpisodeOptions {
    /// Request dubbed episodes.
    pub dub: bool,
    /// Annotate filler episodes.
    #[serde(rename = "fetchFiller")]
    pub include_fillers: bool,
}

impl EpisodeOptions {
    pub fn new(dub: bool, include_fillers: bool) -> Self {
        Self {
            dub,
            include_fillers,
        }
    }
}

/// Filters for the advanced search operation, already validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(flatten)]
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<MediaSort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

/// Airing schedule window.
///
/// Week bounds are passed through verbatim; upstreams accept either unix
/// timestamps or date strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringSchedule {
    #[serde(flatten)]
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_end: Option<String>,
    pub not_yet_aired: bool,
}

/// Interpret a query-string boolean. Only `true` and `1` are truthy.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw, "true" | "1")
}

/// Serde adapter for optional query-string booleans (`?dub=1`).
pub fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().is_some_and(parse_flag))
}
