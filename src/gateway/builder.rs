//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::MetaGateway;
use crate::cache::{CacheStore, Clock, LocalClock, MemoryStore, MemoryStoreConfig, TtlPolicy};
use crate::providers::{
    CredentialHandle, HttpSessionProvider, ProviderDescriptor, ProviderFactory, ProviderRegistry,
    ProxyPool, SessionProvider, UpstreamConfig, UpstreamFactory,
};
use crate::Result;

/// Main entry point for creating gateway instances.
pub struct Huginn;

impl Huginn {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> HuginnBuilder {
        HuginnBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// With no further configuration the gateway talks to the extraction
/// service at [`DEFAULT_BASE_URL`](crate::providers::DEFAULT_BASE_URL),
/// egresses directly, and caches nothing.
pub struct HuginnBuilder {
    upstream: UpstreamConfig,
    default_provider: Option<String>,
    proxies: ProxyPool,
    cache: Option<Arc<dyn CacheStore>>,
    ttl: TtlPolicy,
    clock: Arc<dyn Clock>,
    namespace: Option<String>,
    session_provider: Option<Arc<dyn SessionProvider>>,
    session_auth_url: Option<String>,
    credential: CredentialHandle,
    default_locale: Option<String>,
    factory: Option<Arc<dyn ProviderFactory>>,
    extra_providers: Vec<ProviderDescriptor>,
}

impl Default for HuginnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HuginnBuilder {
    pub fn new() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            default_provider: None,
            proxies: ProxyPool::direct(),
            cache: None,
            ttl: TtlPolicy::default(),
            clock: Arc::new(LocalClock),
            namespace: None,
            session_provider: None,
            session_auth_url: None,
            credential: CredentialHandle::default(),
            default_locale: None,
            factory: None,
            extra_providers: Vec::new(),
        }
    }

    /// Base URL of the extraction service.
    pub fn upstream(mut self, base_url: impl Into<String>) -> Self {
        self.upstream.base_url = base_url.into();
        self
    }

    /// Per-request timeout for upstream calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.upstream.timeout = timeout;
        self
    }

    /// Backend used when a request names none (default: `gogoanime`).
    pub fn default_provider(mut self, name: impl Into<String>) -> Self {
        self.default_provider = Some(name.into());
        self
    }

    /// Egress proxies drawn from on every provider construction.
    pub fn proxies(mut self, proxies: ProxyPool) -> Self {
        self.proxies = proxies;
        self
    }

    /// Use a custom cache store.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(store);
        self
    }

    /// Use an in-process moka cache.
    pub fn memory_cache(self, config: MemoryStoreConfig) -> Self {
        self.cache_store(Arc::new(MemoryStore::new(&config)))
    }

    pub fn ttl_policy(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the calendar used for weekend TTLs.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Prefix every cache key, e.g. to share one Redis between deployments.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Use a custom session provider.
    pub fn session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.session_provider = Some(provider);
        self
    }

    /// Acquire sessions from the HTTP token endpoint at `url`.
    ///
    /// Ignored when [`session_provider`](Self::session_provider) is set.
    pub fn session_auth_url(mut self, url: impl Into<String>) -> Self {
        self.session_auth_url = Some(url.into());
        self
    }

    /// Share a credential handle the caller keeps refreshing.
    pub fn credential(mut self, credential: CredentialHandle) -> Self {
        self.credential = credential;
        self
    }

    /// Locale for sessions when a request names none (default: `en-US`).
    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// Replace the upstream HTTP client factory.
    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Register an additional backend, or replace a builtin one.
    pub fn register_provider(mut self, descriptor: ProviderDescriptor) -> Self {
        self.extra_providers.push(descriptor);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<MetaGateway> {
        let factory: Arc<dyn ProviderFactory> = match self.factory {
            Some(factory) => factory,
            None => Arc::new(UpstreamFactory::new(self.upstream)),
        };

        let mut registry = ProviderRegistry::new(factory);
        for descriptor in self.extra_providers {
            registry.register(descriptor);
        }
        if let Some(name) = &self.default_provider {
            registry.set_default(name)?;
        }
        registry.set_proxies(self.proxies);
        registry.set_credential(self.credential);
        if let Some(locale) = self.default_locale {
            registry.set_default_locale(locale);
        }

        let sessions = match (self.session_provider, self.session_auth_url) {
            (Some(provider), _) => Some(provider),
            (None, Some(url)) => {
                Some(Arc::new(HttpSessionProvider::new(url)?) as Arc<dyn SessionProvider>)
            }
            (None, None) => None,
        };
        if let Some(sessions) = sessions {
            registry.set_session_provider(sessions);
        }

        Ok(MetaGateway::new(
            registry,
            self.cache,
            self.ttl,
            self.clock,
            self.namespace,
        ))
    }
}
