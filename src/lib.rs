//! Huginn - anime metadata gateway
//!
//! This crate answers anime metadata, episode and streaming-source queries
//! by resolving a backend ("provider") per request and shielding upstreams
//! from redundant load with a cache-aside layer.
//!
//! - Provider resolution: case-insensitive lookup over a closed registry,
//!   an independent egress proxy draw per instance, and session
//!   acquisition for backends that need one.
//! - Cache-aside fetch: compute-if-absent over an optional store, with
//!   TTLs that follow data volatility and the day of week.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::cache::MemoryStoreConfig;
//! use huginn::gateway::PageQuery;
//! use huginn::Huginn;
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let gateway = Huginn::builder()
//!         .upstream("http://127.0.0.1:3001")
//!         .memory_cache(MemoryStoreConfig::default())
//!         .build()?;
//!
//!     let trending = gateway.trending(&PageQuery::new(1, 10)).await?;
//!     println!("{trending}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod gateway;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{HuginnError, Result};
pub use gateway::{Huginn, HuginnBuilder, MetaGateway};
pub use providers::{MetadataProvider, ProviderInstance, ProviderRegistry, SessionProvider};
pub use version::{PKG_VERSION, version_string};
