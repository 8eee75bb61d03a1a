//! HTTP client for the upstream extraction service.
//!
//! Each [`UpstreamClient`] is bound to one backend name, at most one egress
//! proxy and at most one session. The extraction service mirrors the
//! gateway's own routes under `{base_url}/anilist/...` and selects the
//! backend from the `provider` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::descriptor::ProviderDescriptor;
use super::proxy::ProxyEndpoint;
use super::registry::ProviderFactory;
use super::session::Session;
use super::traits::MetadataProvider;
use crate::types::{AdvancedSearch, AiringSchedule, EpisodeOptions, Genre, Page, Payload};
use crate::{HuginnError, Result};

/// Default base URL of the extraction service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3001";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

type Query = Vec<(&'static str, String)>;

fn page_query(page: Page) -> Query {
    vec![
        ("page", page.page.to_string()),
        ("perPage", page.per_page.to_string()),
    ]
}

fn episode_query(options: EpisodeOptions) -> Query {
    vec![
        ("dub", options.dub.to_string()),
        ("fetchFiller", options.include_fillers.to_string()),
    ]
}

fn json_list<T: serde::Serialize>(items: &[T]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// A provider instance backed by the extraction service.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
    provider: String,
    session: Option<Session>,
}

impl UpstreamClient {
    /// Build a client for `provider`, egressing through `proxy` when given.
    pub fn new(
        config: &UpstreamConfig,
        provider: impl Into<String>,
        proxy: Option<&ProxyEndpoint>,
        session: Option<Session>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            HuginnError::Configuration(format!("invalid upstream url {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HuginnError::Configuration(format!(
                "upstream url {:?} cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| HuginnError::Configuration(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            provider: provider.into(),
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("anilist").extend(segments);
        }
        url
    }

    async fn get(&self, segments: &[&str], mut query: Query) -> Result<Payload> {
        let url = self.endpoint(segments);
        query.push(("provider", self.provider.clone()));

        let mut request = self.http.get(url.clone());
        if let Some(session) = &self.session {
            query.push(("locale", session.locale().to_string()));
            request = request.bearer_auth(session.token());
        }

        debug!(provider = %self.provider, path = %url.path(), "upstream request");
        let response = request.query(&query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HuginnError::NotFound(segments.join("/")));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HuginnError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Payload>().await?)
    }
}

#[async_trait]
impl MetadataProvider for UpstreamClient {
    fn name(&self) -> &str {
        &self.provider
    }

    async fn search(&self, query: &str, page: Page) -> Result<Payload> {
        self.get(&[query], page_query(page)).await
    }

    async fn advanced_search(&self, filters: &AdvancedSearch) -> Result<Payload> {
        let mut query = page_query(filters.page);
        let optional = [
            ("query", &filters.query),
            ("type", &filters.media_type),
            ("format", &filters.format),
            ("id", &filters.id),
            ("status", &filters.status),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                query.push((name, value.clone()));
            }
        }
        if let Some(year) = filters.year {
            query.push(("year", year.to_string()));
        }
        if let Some(season) = filters.season {
            query.push(("season", season.to_string()));
        }
        if !filters.genres.is_empty() {
            query.push(("genres", json_list(&filters.genres)?));
        }
        if !filters.sort.is_empty() {
            query.push(("sort", json_list(&filters.sort)?));
        }
        self.get(&["advanced-search"], query).await
    }

    async fn fetch_trending(&self, page: Page) -> Result<Payload> {
        self.get(&["trending"], page_query(page)).await
    }

    async fn fetch_popular(&self, page: Page) -> Result<Payload> {
        self.get(&["popular"], page_query(page)).await
    }

    async fn fetch_airing_schedule(&self, schedule: &AiringSchedule) -> Result<Payload> {
        let mut query = page_query(schedule.page);
        if let Some(start) = &schedule.week_start {
            query.push(("weekStart", start.clone()));
        }
        if let Some(end) = &schedule.week_end {
            query.push(("weekEnd", end.clone()));
        }
        query.push(("notYetAired", schedule.not_yet_aired.to_string()));
        self.get(&["airing-schedule"], query).await
    }

    async fn fetch_by_genre(&self, genres: &[Genre], page: Page) -> Result<Payload> {
        let mut query = page_query(page);
        query.push(("genres", json_list(genres)?));
        self.get(&["genre"], query).await
    }

    async fn fetch_recent_episodes(&self, sub_provider: &str, page: Page) -> Result<Payload> {
        let mut query = page_query(page);
        query.push(("source", sub_provider.to_string()));
        self.get(&["recent-episodes"], query).await
    }

    async fn fetch_random(&self) -> Result<Payload> {
        self.get(&["random-anime"], Query::new()).await
    }

    async fn fetch_episode_servers(&self, id: &str) -> Result<Payload> {
        self.get(&["servers", id], Query::new()).await
    }

    async fn fetch_episodes_list(&self, id: &str, options: EpisodeOptions) -> Result<Payload> {
        self.get(&["episodes", id], episode_query(options)).await
    }

    async fn fetch_info_by_id(&self, id: &str) -> Result<Payload> {
        self.get(&["data", id], Query::new()).await
    }

    async fn fetch_info_with_episodes(
        &self,
        id: &str,
        options: EpisodeOptions,
    ) -> Result<Payload> {
        self.get(&["info", id], episode_query(options)).await
    }

    async fn fetch_character_info(&self, id: &str) -> Result<Payload> {
        self.get(&["character", id], Query::new()).await
    }

    async fn fetch_stream_sources(&self, episode_id: &str) -> Result<Payload> {
        self.get(&["watch", episode_id], Query::new()).await
    }
}

/// Builds [`UpstreamClient`] instances for the resolver.
#[derive(Debug, Clone, Default)]
pub struct UpstreamFactory {
    config: UpstreamConfig,
}

impl UpstreamFactory {
    pub fn new(config: UpstreamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }
}

impl ProviderFactory for UpstreamFactory {
    fn build(
        &self,
        descriptor: &ProviderDescriptor,
        proxy: Option<&ProxyEndpoint>,
        session: Option<Session>,
    ) -> Result<Box<dyn MetadataProvider>> {
        let client = UpstreamClient::new(&self.config, descriptor.identity(), proxy, session)?;
        Ok(Box::new(client))
    }
}
