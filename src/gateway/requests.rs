//! Raw request parameters as they arrive from the HTTP surface.
//!
//! These mirror query strings one-to-one and are not yet validated;
//! [`MetaGateway`](super::MetaGateway) checks them before any provider or
//! cache work happens.

use serde::Deserialize;

use crate::types::{
    AdvancedSearch, AiringSchedule, EpisodeOptions, Genre, Page, Season, deserialize_flag,
    parse_genres, parse_sort,
};
use crate::{HuginnError, Result};

/// Sub-provider listed by recent-episodes when none is named.
pub const DEFAULT_RECENT_PROVIDER: &str = "gogoanime";

/// `?page=&perPage=`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// The pagination window with defaults applied.
    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

/// Advanced search filters. `genres` and `sort` are JSON-encoded lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchQuery {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub format: Option<String>,
    pub sort: Option<String>,
    pub genres: Option<String>,
    pub id: Option<String>,
    pub year: Option<u32>,
    pub status: Option<String>,
    pub season: Option<String>,
}

impl AdvancedSearchQuery {
    /// Decode list parameters and check every vocabulary-bound value.
    pub fn validate(&self) -> Result<AdvancedSearch> {
        let genres = match &self.genres {
            Some(raw) => parse_genres(raw)?,
            None => Vec::new(),
        };
        let sort = match &self.sort {
            Some(raw) => parse_sort(raw)?,
            None => Vec::new(),
        };
        let season = self
            .season
            .as_deref()
            .map(str::parse::<Season>)
            .transpose()?;

        Ok(AdvancedSearch {
            query: self.query.clone(),
            media_type: self.media_type.clone(),
            page: Page::new(self.page, self.per_page),
            format: self.format.clone(),
            sort,
            genres,
            id: self.id.clone(),
            year: self.year,
            status: self.status.clone(),
            season,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringScheduleQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub week_start: Option<String>,
    pub week_end: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub not_yet_aired: bool,
}

impl AiringScheduleQuery {
    pub fn schedule(&self) -> AiringSchedule {
        AiringSchedule {
            page: Page::new(self.page, self.per_page),
            week_start: self.week_start.clone(),
            week_end: self.week_end.clone(),
            not_yet_aired: self.not_yet_aired,
        }
    }
}

/// `?genres=["Action"]&page=&perPage=`. `genres` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreQuery {
    pub genres: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl GenreQuery {
    pub fn validate(&self) -> Result<(Vec<Genre>, Page)> {
        let raw = self
            .genres
            .as_deref()
            .ok_or(HuginnError::MissingParameter("genres"))?;
        let genres = parse_genres(raw)?;
        if genres.is_empty() {
            return Err(HuginnError::MissingParameter("genres"));
        }
        Ok((genres, Page::new(self.page, self.per_page)))
    }
}

/// `provider` here names the listing source, not the resolved backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEpisodesQuery {
    pub provider: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl RecentEpisodesQuery {
    pub fn sub_provider(&self) -> &str {
        self.provider.as_deref().unwrap_or(DEFAULT_RECENT_PROVIDER)
    }

    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

/// Provider override for servers and watch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderQuery {
    pub provider: Option<String>,
    pub locale: Option<String>,
}

impl ProviderQuery {
    pub fn provider(name: impl Into<String>) -> Self {
        Self {
            provider: Some(name.into()),
            locale: None,
        }
    }
}

/// Provider override plus episode options for episodes and info.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesQuery {
    pub provider: Option<String>,
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub dub: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub fetch_filler: bool,
}

impl EpisodesQuery {
    pub fn options(&self) -> EpisodeOptions {
        EpisodeOptions::new(self.dub, self.fetch_filler)
    }
}
