//! Provider registry and per-request resolver.
//!
//! The `ProviderRegistry` holds the closed set of backend descriptors and
//! turns a requested backend name into a fresh [`ProviderInstance`].
//! Instances are never cached or shared: every resolution performs its own
//! proxy draw and, for session-requiring backends, its own session
//! acquisition.
//!
//! # Resolution Flow
//!
//! ```text
//! resolve(Some("CrunchyRoll"), locale)
//!              │
//!              ▼
//!   ┌───────────────────────┐
//!   │ case-insensitive      │ ──► unknown name: UnknownProvider (400)
//!   │ descriptor lookup     │
//!   └──────────┬────────────┘
//!              ▼
//!   ┌───────────────────────┐
//!   │ ProxyPool::select()   │ ──► independent uniform draw, or direct
//!   └──────────┬────────────┘
//!              ▼
//!   ┌───────────────────────┐
//!   │ requires session?     │ ──► create_session(locale, credential)
//!   │                       │     failure: Session error, no fallback
//!   └──────────┬────────────┘
//!              ▼
//!   ┌───────────────────────┐
//!   │ ProviderFactory       │ ──► ProviderInstance
//!   └───────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::descriptor::{BuiltinProvider, ProviderDescriptor, builtin_descriptors};
use super::instance::ProviderInstance;
use super::proxy::{ProxyEndpoint, ProxyPool};
use super::session::{CredentialHandle, DEFAULT_LOCALE, Session};
use super::traits::{MetadataProvider, SessionProvider};
use crate::telemetry;
use crate::{HuginnError, Result};

/// Constructs the client behind a provider instance.
///
/// The registry decides *which* backend, proxy and session; the factory
/// decides *how* a client for them is built.
pub trait ProviderFactory: Send + Sync {
    fn build(
        &self,
        descriptor: &ProviderDescriptor,
        proxy: Option<&ProxyEndpoint>,
        session: Option<Session>,
    ) -> Result<Box<dyn MetadataProvider>>;
}

/// Registry of backend descriptors plus everything needed to instantiate
/// them.
pub struct ProviderRegistry {
    descriptors: Vec<ProviderDescriptor>,
    default_provider: String,
    proxies: ProxyPool,
    factory: Arc<dyn ProviderFactory>,
    sessions: Option<Arc<dyn SessionProvider>>,
    credential: CredentialHandle,
    default_locale: String,
}

impl ProviderRegistry {
    /// Create a registry with the builtin backends, `gogoanime` as default,
    /// direct egress and no session provider.
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            descriptors: builtin_descriptors(),
            default_provider: BuiltinProvider::DEFAULT.as_str().to_string(),
            proxies: ProxyPool::direct(),
            factory,
            sessions: None,
            credential: CredentialHandle::default(),
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn set_proxies(&mut self, proxies: ProxyPool) {
        self.proxies = proxies;
    }

    pub fn set_session_provider(&mut self, provider: Arc<dyn SessionProvider>) {
        self.sessions = Some(provider);
    }

    /// Share the process-wide credential handle with the resolver.
    ///
    /// The registry only reads it; refreshing is up to the caller.
    pub fn set_credential(&mut self, credential: CredentialHandle) {
        self.credential = credential;
    }

    pub fn set_default_locale(&mut self, locale: impl Into<String>) {
        self.default_locale = locale.into();
    }

    /// Change the backend used when a request names none.
    ///
    /// Fails with `UnknownProvider` if `name` is not registered.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        let canonical = self.descriptor(name)?.name().to_string();
        self.default_provider = canonical;
        Ok(())
    }

    /// Register a backend, replacing any descriptor with the same name.
    pub fn register(&mut self, descriptor: ProviderDescriptor) {
        self.descriptors.retain(|d| !d.matches(descriptor.name()));
        self.descriptors.push(descriptor);
    }

    /// Case-insensitive descriptor lookup.
    pub fn descriptor(&self, name: &str) -> Result<&ProviderDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.matches(name))
            .ok_or_else(|| HuginnError::UnknownProvider(name.to_string()))
    }

    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }

    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    pub fn proxies(&self) -> &ProxyPool {
        &self.proxies
    }

    pub fn credential(&self) -> &CredentialHandle {
        &self.credential
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Construct a provider instance for `requested`, or for the default
    /// backend when no name is given.
    ///
    /// `locale` only matters for session-requiring backends and falls back
    /// to the registry's default locale.
    #[instrument(skip(self), fields(provider = tracing::field::Empty))]
    pub async fn resolve(
        &self,
        requested: Option<&str>,
        locale: Option<&str>,
    ) -> Result<ProviderInstance> {
        let name = requested.unwrap_or(&self.default_provider);
        let descriptor = self.descriptor(name)?.clone();
        tracing::Span::current().record("provider", descriptor.name());

        let proxy = self.proxies.select();

        let session = if descriptor.requires_session() {
            let locale = locale.unwrap_or(&self.default_locale);
            Some(self.acquire_session(&descriptor, locale).await?)
        } else {
            None
        };
        let session_locale = session.as_ref().map(|s| s.locale().to_string());

        let client = self.factory.build(&descriptor, proxy.as_ref(), session)?;

        debug!(
            proxied = proxy.is_some(),
            session = session_locale.is_some(),
            "provider instance constructed"
        );

        Ok(ProviderInstance::new(descriptor, proxy, session_locale, client))
    }

    /// Construct an instance of the default backend.
    pub async fn resolve_default(&self) -> Result<ProviderInstance> {
        self.resolve(None, None).await
    }

    /// Construct a default instance with a fresh proxy draw and discard it.
    ///
    /// Instances hold no shared state, so this has no observable effect
    /// beyond the draw itself.
    pub async fn reset(&self) -> Result<()> {
        let instance = self.resolve_default().await?;
        debug!(provider = instance.identity(), "default provider reset");
        Ok(())
    }

    async fn acquire_session(
        &self,
        descriptor: &ProviderDescriptor,
        locale: &str,
    ) -> Result<Session> {
        let result = self.try_acquire_session(locale).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            telemetry::SESSIONS_TOTAL,
            "provider" => descriptor.identity(),
            "status" => status
        )
        .increment(1);

        result.inspect_err(|e| {
            warn!(provider = descriptor.name(), locale, error = %e, "session acquisition failed");
        })
    }

    async fn try_acquire_session(&self, locale: &str) -> Result<Session> {
        let sessions = self
            .sessions
            .as_ref()
            .ok_or_else(|| HuginnError::Session("no session provider configured".to_string()))?;
        let credential = self
            .credential
            .current()
            .ok_or_else(|| HuginnError::Session("no credential configured".to_string()))?;

        sessions
            .create_session(locale, &credential)
            .await
            .map_err(|e| match e {
                HuginnError::Session(_) => e,
                other => HuginnError::Session(other.to_string()),
            })
    }
}
