//! Caching subsystem.
//!
//! - [`CacheStore`]: byte-oriented key-value store with per-entry expiry.
//!   [`MemoryStore`] (moka) is in-process; [`RedisStore`] (feature
//!   `redis`) is shared between gateway instances.
//!
//! - [`fetch()`]: the cache-aside primitive every cached operation goes
//!   through. With no store configured it simply runs the producer.
//!
//! - [`CacheKey`]: deterministic key of operation tag + parameters +
//!   resolved provider identity.
//!
//! - [`TtlPolicy`] / [`Clock`]: how long each operation's results live,
//!   including the weekend extension for per-title data.

mod fetch;
mod key;
#[cfg(feature = "redis")]
mod redis_store;
mod store;
mod ttl;

pub use fetch::fetch;
pub use key::CacheKey;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use store::{CacheStore, MemoryStore, MemoryStoreConfig};
pub use ttl::{Clock, FixedClock, LocalClock, TtlPolicy};
