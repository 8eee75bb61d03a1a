//! Redis-backed cache store, shared across gateway instances.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::CacheStore;
use crate::{HuginnError, Result};

impl From<redis::RedisError> for HuginnError {
    fn from(err: redis::RedisError) -> Self {
        HuginnError::Cache(err.to_string())
    }
}

/// Cache store backed by a Redis server.
///
/// Holds a [`ConnectionManager`], which multiplexes commands over one
/// connection and reconnects transparently after failures.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis server at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| HuginnError::Configuration(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(url, "connected to redis cache store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }
}
