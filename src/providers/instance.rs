//! Per-request provider instances.

use async_trait::async_trait;

use super::descriptor::ProviderDescriptor;
use super::proxy::ProxyEndpoint;
use super::traits::MetadataProvider;
use crate::types::{AdvancedSearch, AiringSchedule, EpisodeOptions, Genre, Page, Payload};
use crate::{HuginnError, Result};

/// A constructed client bound to one descriptor, at most one proxy and at
/// most one session.
///
/// Owned by the request that resolved it and dropped with it. Never mutated
/// after construction. Backend-reaching operations are checked against the
/// descriptor's capabilities before any I/O.
pub struct ProviderInstance {
    descriptor: ProviderDescriptor,
    identity: String,
    proxy: Option<ProxyEndpoint>,
    session_locale: Option<String>,
    client: Box<dyn MetadataProvider>,
}

impl ProviderInstance {
    pub fn new(
        descriptor: ProviderDescriptor,
        proxy: Option<ProxyEndpoint>,
        session_locale: Option<String>,
        client: Box<dyn MetadataProvider>,
    ) -> Self {
        Self {
            identity: descriptor.identity(),
            descriptor,
            proxy,
            session_locale,
            client,
        }
    }

    /// Identity folded into cache keys.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// The proxy this instance egresses through, if any.
    pub fn proxy(&self) -> Option<&ProxyEndpoint> {
        self.proxy.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session_locale.is_some()
    }

    pub fn session_locale(&self) -> Option<&str> {
        self.session_locale.as_deref()
    }

    fn require(&self, supported: bool, operation: &'static str) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(HuginnError::Unsupported {
                provider: self.identity.clone(),
                operation,
            })
        }
    }
}

impl std::fmt::Debug for ProviderInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderInstance")
            .field("provider", &self.identity)
            .field("proxy", &self.proxy)
            .field("session_locale", &self.session_locale)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MetadataProvider for ProviderInstance {
    fn name(&self) -> &str {
        &self.identity
    }

    async fn search(&self, query: &str, page: Page) -> Result<Payload> {
        self.client.search(query, page).await
    }

    async fn advanced_search(&self, filters: &AdvancedSearch) -> Result<Payload> {
        self.client.advanced_search(filters).await
    }

    async fn fetch_trending(&self, page: Page) -> Result<Payload> {
        self.client.fetch_trending(page).await
    }

    async fn fetch_popular(&self, page: Page) -> Result<Payload> {
        self.client.fetch_popular(page).await
    }

    async fn fetch_airing_schedule(&self, schedule: &AiringSchedule) -> Result<Payload> {
        self.client.fetch_airing_schedule(schedule).await
    }

    async fn fetch_by_genre(&self, genres: &[Genre], page: Page) -> Result<Payload> {
        self.client.fetch_by_genre(genres, page).await
    }

    async fn fetch_recent_episodes(&self, sub_provider: &str, page: Page) -> Result<Payload> {
        self.client.fetch_recent_episodes(sub_provider, page).await
    }

    async fn fetch_random(&self) -> Result<Payload> {
        self.client.fetch_random().await
    }

    async fn fetch_episode_servers(&self, id: &str) -> Result<Payload> {
        self.require(
            self.descriptor.capabilities().servers,
            "fetch_episode_servers",
        )?;
        self.client.fetch_episode_servers(id).await
    }

    async fn fetch_episodes_list(&self, id: &str, options: EpisodeOptions) -> Result<Payload> {
        self.require(self.descriptor.capabilities().episodes, "fetch_episodes_list")?;
        self.client.fetch_episodes_list(id, options).await
    }

    async fn fetch_info_by_id(&self, id: &str) -> Result<Payload> {
        self.client.fetch_info_by_id(id).await
    }

    async fn fetch_info_with_episodes(
        &self,
        id: &str,
        options: EpisodeOptions,
    ) -> Result<Payload> {
        self.require(
            self.descriptor.capabilities().episodes,
            "fetch_info_with_episodes",
        )?;
        self.client.fetch_info_with_episodes(id, options).await
    }

    async fn fetch_character_info(&self, id: &str) -> Result<Payload> {
        self.client.fetch_character_info(id).await
    }

    async fn fetch_stream_sources(&self, episode_id: &str) -> Result<Payload> {
        self.require(self.descriptor.capabilities().sources, "fetch_stream_sources")?;
        self.client.fetch_stream_sources(episode_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::Capabilities;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetadataProvider for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch_episode_servers(&self, _id: &str) -> Result<Payload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!([]))
        }
    }

    #[tokio::test]
    async fn missing_capability_short_circuits() {
        let descriptor = ProviderDescriptor::new("Bilibili", Capabilities::without_servers());
        let instance =
            ProviderInstance::new(descriptor, None, None, Box::new(Counting::default()));

        let err = instance.fetch_episode_servers("1").await.unwrap_err();
        assert!(matches!(
            err,
            HuginnError::Unsupported { ref provider, operation: "fetch_episode_servers" }
                if provider == "bilibili"
        ));
    }

    #[tokio::test]
    async fn supported_operation_delegates() {
        let descriptor = ProviderDescriptor::new("zoro", Capabilities::full());
        let instance =
            ProviderInstance::new(descriptor, None, None, Box::new(Counting::default()));

        assert_eq!(instance.name(), "zoro");
        assert!(instance.fetch_episode_servers("1").await.is_ok());
        assert!(!instance.has_session());
        assert!(instance.proxy().is_none());
    }

    #[tokio::test]
    async fn default_operations_are_unsupported() {
        let descriptor = ProviderDescriptor::new("zoro", Capabilities::full());
        let instance =
            ProviderInstance::new(descriptor, None, None, Box::new(Counting::default()));

        let err = instance.fetch_random().await.unwrap_err();
        assert!(matches!(err, HuginnError::Unsupported { .. }));
    }
}
