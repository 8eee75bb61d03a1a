//! Metadata gateway: per-operation orchestration.
//!
//! Every operation follows the same path:
//!
//! 1. validate parameters (before any provider or cache work)
//! 2. resolve a fresh provider instance (proxy draw, session if needed)
//! 3. for cache-eligible operations, build the key from the operation tag,
//!    every result-affecting parameter, the resolved provider identity and,
//!    for session-bound instances, the session locale
//! 4. run the provider capability through [`cache::fetch`] with the TTL
//!    the policy assigns to the operation
//!
//! Cache-eligible operations are trending, popular, episodes, info and
//! watch. The rest call the provider directly. Request metrics cover
//! steps 2 to 4, so resolution failures are counted too.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{instrument, warn};

use super::requests::{
    AdvancedSearchQuery, AiringScheduleQuery, EpisodesQuery, GenreQuery, PageQuery,
    ProviderQuery, RecentEpisodesQuery,
};
use crate::cache::{self, CacheKey, CacheStore, Clock, TtlPolicy};
use crate::providers::{MetadataProvider, ProviderInstance, ProviderRegistry};
use crate::types::Payload;
use crate::{HuginnError, Result, telemetry};

/// The metadata gateway.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct MetaGateway {
    registry: ProviderRegistry,
    cache: Option<Arc<dyn CacheStore>>,
    ttl: TtlPolicy,
    clock: Arc<dyn Clock>,
    namespace: Option<String>,
}

impl MetaGateway {
    pub(crate) fn new(
        registry: ProviderRegistry,
        cache: Option<Arc<dyn CacheStore>>,
        ttl: TtlPolicy,
        clock: Arc<dyn Clock>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            registry,
            cache,
            ttl,
            clock,
            namespace,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl
    }

    /// Whether a cache store is configured.
    pub fn caching(&self) -> bool {
        self.cache.is_some()
    }

    // ========================================================================
    // Listing and discovery
    // ========================================================================

    #[instrument(skip(self, page), fields(operation = "search"))]
    pub async fn search(&self, query: &str, page: &PageQuery) -> Result<Payload> {
        if query.trim().is_empty() {
            return Err(HuginnError::MissingParameter("query"));
        }
        let page = page.page();
        self.observe("search", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.search(query, page).await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "advanced_search"))]
    pub async fn advanced_search(&self, query: &AdvancedSearchQuery) -> Result<Payload> {
        let filters = query.validate()?;
        self.observe("advanced_search", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.advanced_search(&filters).await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "trending"))]
    pub async fn trending(&self, query: &PageQuery) -> Result<Payload> {
        let page = query.page();
        self.observe("trending", None, async {
            let instance = self.registry.resolve_default().await?;
            let key = self.key("trending").part(page.page).part(page.per_page);
            cache::fetch(
                self.store(),
                &key,
                || instance.fetch_trending(page),
                self.ttl.listing,
            )
            .await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "popular"))]
    pub async fn popular(&self, query: &PageQuery) -> Result<Payload> {
        let page = query.page();
        self.observe("popular", None, async {
            let instance = self.registry.resolve_default().await?;
            let key = self.key("popular").part(page.page).part(page.per_page);
            cache::fetch(
                self.store(),
                &key,
                || instance.fetch_popular(page),
                self.ttl.listing,
            )
            .await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "airing_schedule"))]
    pub async fn airing_schedule(&self, query: &AiringScheduleQuery) -> Result<Payload> {
        let schedule = query.schedule();
        self.observe("airing_schedule", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.fetch_airing_schedule(&schedule).await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "genre"))]
    pub async fn genre(&self, query: &GenreQuery) -> Result<Payload> {
        let (genres, page) = query.validate()?;
        self.observe("genre", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.fetch_by_genre(&genres, page).await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "recent_episodes"))]
    pub async fn recent_episodes(&self, query: &RecentEpisodesQuery) -> Result<Payload> {
        let page = query.page();
        self.observe("recent_episodes", None, async {
            let instance = self.registry.resolve_default().await?;
            instance
                .fetch_recent_episodes(query.sub_provider(), page)
                .await
        })
        .await
    }

    #[instrument(skip_all, fields(operation = "random"))]
    pub async fn random(&self) -> Result<Payload> {
        self.observe("random", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.fetch_random().await
        })
        .await
    }

    // ========================================================================
    // Per-title operations
    // ========================================================================

    #[instrument(skip(self, query), fields(operation = "servers"))]
    pub async fn servers(&self, id: &str, query: &ProviderQuery) -> Result<Payload> {
        let provider = query.provider.as_deref();
        let result = self
            .observe("servers", provider, async {
                let instance = self
                    .registry
                    .resolve(provider, query.locale.as_deref())
                    .await?;
                instance.fetch_episode_servers(id).await
            })
            .await;
        self.reset_after_override(provider).await;
        result
    }

    #[instrument(skip(self, query), fields(operation = "episodes"))]
    pub async fn episodes(&self, id: &str, query: &EpisodesQuery) -> Result<Payload> {
        let options = query.options();
        let provider = query.provider.as_deref();
        let result = self
            .observe("episodes", provider, async {
                let instance = self
                    .registry
                    .resolve(provider, query.locale.as_deref())
                    .await?;
                let key = self
                    .key("episodes")
                    .part(id)
                    .part(options.dub)
                    .part(options.include_fillers);
                let key = bind_instance(key, &instance);
                let ttl = self.ttl.item(self.clock.weekday());
                cache::fetch(
                    self.store(),
                    &key,
                    || instance.fetch_episodes_list(id, options),
                    ttl,
                )
                .await
            })
            .await;
        self.reset_after_override(provider).await;
        result
    }

    /// Title info including the episode list.
    #[instrument(skip(self, query), fields(operation = "info"))]
    pub async fn info(&self, id: &str, query: &EpisodesQuery) -> Result<Payload> {
        let options = query.options();
        let provider = query.provider.as_deref();
        let result = self
            .observe("info", provider, async {
                let instance = self
                    .registry
                    .resolve(provider, query.locale.as_deref())
                    .await?;
                let key = self
                    .key("info")
                    .part(id)
                    .part(options.dub)
                    .part(options.include_fillers);
                let key = bind_instance(key, &instance);
                let ttl = self.ttl.item(self.clock.weekday());
                cache::fetch(
                    self.store(),
                    &key,
                    || instance.fetch_info_with_episodes(id, options),
                    ttl,
                )
                .await
            })
            .await;
        self.reset_after_override(provider).await;
        result
    }

    /// Title info without episodes.
    #[instrument(skip(self), fields(operation = "data"))]
    pub async fn data(&self, id: &str) -> Result<Payload> {
        self.observe("data", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.fetch_info_by_id(id).await
        })
        .await
    }

    #[instrument(skip(self), fields(operation = "character"))]
    pub async fn character(&self, id: &str) -> Result<Payload> {
        self.observe("character", None, async {
            let instance = self.registry.resolve_default().await?;
            instance.fetch_character_info(id).await
        })
        .await
    }

    /// Stream sources for one episode.
    #[instrument(skip(self, query), fields(operation = "watch"))]
    pub async fn watch(&self, episode_id: &str, query: &ProviderQuery) -> Result<Payload> {
        let provider = query.provider.as_deref();
        let result = self
            .observe("watch", provider, async {
                let instance = self
                    .registry
                    .resolve(provider, query.locale.as_deref())
                    .await?;
                let key = bind_instance(self.key("watch").part(episode_id), &instance);
                cache::fetch(
                    self.store(),
                    &key,
                    || instance.fetch_stream_sources(episode_id),
                    self.ttl.sources,
                )
                .await
            })
            .await;
        self.reset_after_override(provider).await;
        result
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn store(&self) -> Option<&dyn CacheStore> {
        self.cache.as_deref()
    }

    fn key(&self, operation: &'static str) -> CacheKey {
        CacheKey::namespaced(self.namespace.as_deref(), operation)
    }

    /// Await `work` (resolution included) and record request metrics.
    async fn observe<T>(
        &self,
        operation: &'static str,
        requested: Option<&str>,
        work: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let start = Instant::now();
        let result = work.await;
        let provider = self.provider_label(requested);
        record_request(operation, &provider, start, result.is_ok());
        result
    }

    /// Metrics label for the backend a request targeted.
    ///
    /// Names outside the registry collapse to `unknown` to keep label
    /// cardinality bounded.
    fn provider_label(&self, requested: Option<&str>) -> String {
        let name = requested.unwrap_or(self.registry.default_provider());
        match self.registry.descriptor(name) {
            Ok(descriptor) => descriptor.identity(),
            Err(_) => "unknown".to_string(),
        }
    }

    /// Rebuild the default instance after a provider-override flow.
    ///
    /// Cleanup only: a failure is logged and never changes the response.
    async fn reset_after_override(&self, provider: Option<&str>) {
        if provider.is_none() {
            return;
        }
        if let Err(e) = self.registry.reset().await {
            warn!(error = %e, "default provider reset failed");
        }
    }
}

/// Finish a per-title key with what the resolved instance contributes: its
/// provider identity and, when session-bound, the session locale.
fn bind_instance(key: CacheKey, instance: &ProviderInstance) -> CacheKey {
    let key = key.part(instance.identity());
    match instance.session_locale() {
        Some(locale) => key.part(locale),
        None => key,
    }
}

/// Record request outcome metrics (counter + histogram).
fn record_request(operation: &'static str, provider: &str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "provider" => provider.to_owned(),
        "operation" => operation,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "provider" => provider.to_owned(),
        "operation" => operation,
    )
    .record(elapsed);
}
