//! Provider resolution and instantiation.
//!
//! This module owns everything between a requested backend name and a
//! usable client: the descriptor registry, proxy egress rotation, session
//! acquisition for session-requiring backends, and the HTTP client that
//! talks to the extraction service.

mod descriptor;
mod instance;
mod proxy;
mod registry;
mod session;
mod traits;
mod upstream;

pub use descriptor::{BuiltinProvider, ProviderDescriptor, builtin_descriptors};
pub use instance::ProviderInstance;
pub use proxy::{ProxyEndpoint, ProxyPool};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use session::{CredentialHandle, DEFAULT_LOCALE, HttpSessionProvider, Session};
pub use traits::{MetadataProvider, SessionProvider};
pub use upstream::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, UpstreamClient, UpstreamConfig, UpstreamFactory};
