//! Provider traits.
//!
//! [`MetadataProvider`] is the capability interface the gateway consumes.
//! How a provider obtains its data (scraping, upstream APIs) is its own
//! business; the gateway only relies on this contract.
//!
//! # Error Semantics
//!
//! - `NotFound`: the upstream has no such item; surfaced as a 404.
//! - `Unsupported`: the bound backend lacks the capability.
//! - anything else: an upstream failure; surfaced as a 500 and never
//!   cached.
//!
//! Every operation has a default implementation returning `Unsupported`,
//! so partial providers only implement what they serve.

use async_trait::async_trait;

use crate::types::{AdvancedSearch, AiringSchedule, EpisodeOptions, Genre, Page, Payload};
use crate::{HuginnError, Result};

use super::session::Session;

fn unsupported(provider: &str, operation: &'static str) -> HuginnError {
    HuginnError::Unsupported {
        provider: provider.to_string(),
        operation,
    }
}

// ============================================================================
// Metadata Provider
// ============================================================================

/// Capability interface of a metadata/streaming backend.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Free-text title search.
    async fn search(&self, _query: &str, _page: Page) -> Result<Payload> {
        Err(unsupported(self.name(), "search"))
    }

    /// Filtered search.
    async fn advanced_search(&self, _filters: &AdvancedSearch) -> Result<Payload> {
        Err(unsupported(self.name(), "advanced_search"))
    }

    async fn fetch_trending(&self, _page: Page) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_trending"))
    }

    async fn fetch_popular(&self, _page: Page) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_popular"))
    }

    async fn fetch_airing_schedule(&self, _schedule: &AiringSchedule) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_airing_schedule"))
    }

    async fn fetch_by_genre(&self, _genres: &[Genre], _page: Page) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_by_genre"))
    }

    /// Latest released episodes as listed by `sub_provider`.
    async fn fetch_recent_episodes(&self, _sub_provider: &str, _page: Page) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_recent_episodes"))
    }

    /// A random title. `NotFound` when the upstream produced nothing.
    async fn fetch_random(&self) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_random"))
    }

    async fn fetch_episode_servers(&self, _id: &str) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_episode_servers"))
    }

    async fn fetch_episodes_list(&self, _id: &str, _options: EpisodeOptions) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_episodes_list"))
    }

    /// Title info without the episode list.
    async fn fetch_info_by_id(&self, _id: &str) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_info_by_id"))
    }

    async fn fetch_info_with_episodes(
        &self,
        _id: &str,
        _options: EpisodeOptions,
    ) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_info_with_episodes"))
    }

    async fn fetch_character_info(&self, _id: &str) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_character_info"))
    }

    /// Playable sources for one episode.
    async fn fetch_stream_sources(&self, _episode_id: &str) -> Result<Payload> {
        Err(unsupported(self.name(), "fetch_stream_sources"))
    }
}

// ============================================================================
// Session Provider
// ============================================================================

/// Acquires authenticated sessions for session-requiring backends.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Create a session bound to `locale`.
    ///
    /// Fails on a rejected credential or a network error.
    async fn create_session(&self, locale: &str, credential: &str) -> Result<Session>;
}
