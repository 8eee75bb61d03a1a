//! The cache-aside primitive.
//!
//! [`fetch`] is the single place where "read cache, else compute and
//! store" is decided. Every cached gateway operation funnels through it
//! with its own key, TTL and producer.
//!
//! # Store failures
//!
//! The store is an optimisation, never a dependency: a read error is
//! treated as a miss, a write error is logged and the computed value is
//! still returned. Both are counted under
//! [`CACHE_ERRORS_TOTAL`](crate::telemetry::CACHE_ERRORS_TOTAL).
//!
//! # Concurrency
//!
//! There is no per-key lock. Two concurrent misses on the same key both
//! run the producer and both write; the later write wins. Producers are
//! expected to be idempotent reads.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CacheKey, CacheStore};
use crate::Result;
use crate::telemetry;

/// Return the value cached under `key`, or compute it with `producer` and
/// cache it for `ttl`.
///
/// - `store` is `None`: the producer runs and its result is returned as is.
/// - hit: the stored value is returned and the producer never runs.
/// - miss: the producer runs; `Ok` values are written with `ttl`, errors
///   are propagated and nothing is written.
pub async fn fetch<T, F, Fut>(
    store: Option<&dyn CacheStore>,
    key: &CacheKey,
    producer: F,
    ttl: Duration,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let Some(store) = store else {
        return producer().await;
    };

    let operation = key.operation();

    match store.get(key.as_str()).await {
        Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation)
                    .increment(1);
                debug!(key = %key, store = store.name(), "cache hit");
                return Ok(value);
            }
            Err(e) => {
                // Unreadable entry (e.g. written by an older build); recompute
                // and overwrite.
                warn!(key = %key, error = %e, "discarding undecodable cache entry");
            }
        },
        Ok(None) => {}
        Err(e) => {
            metrics::counter!(telemetry::CACHE_ERRORS_TOTAL,
                "operation" => operation,
                "direction" => "read",
            )
            .increment(1);
            warn!(key = %key, store = store.name(), error = %e, "cache read failed, treating as miss");
        }
    }

    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation).increment(1);
    debug!(key = %key, store = store.name(), "cache miss");

    let value = producer().await?;

    match serde_json::to_vec(&value) {
        Ok(bytes) => {
            if let Err(e) = store.set(key.as_str(), bytes, ttl).await {
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL,
                    "operation" => operation,
                    "direction" => "write",
                )
                .increment(1);
                warn!(key = %key, store = store.name(), error = %e, "cache write failed");
            }
        }
        Err(e) => warn!(key = %key, error = %e, "value not cacheable"),
    }

    Ok(value)
}
