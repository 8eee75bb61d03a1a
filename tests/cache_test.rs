//! Tests for the cache-aside fetch primitive.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use huginn::cache::{CacheKey, CacheStore, MemoryStore, fetch};
use huginn::{HuginnError, Result};

// ============================================================================
// Test stores
// ============================================================================

/// Memory store that also records every write and its TTL.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, Duration)>>,
}

#[async_trait]
impl CacheStore for RecordingStore {
    fn name(&self) -> &str {
        "recording"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.writes.lock().unwrap().push((key.to_string(), ttl));
        self.inner.set(key, value, ttl).await
    }
}

/// Store whose every operation fails.
struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(HuginnError::Cache("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
        Err(HuginnError::Cache("connection refused".into()))
    }
}

const TTL: Duration = Duration::from_secs(60);

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn second_fetch_is_served_from_cache() {
    let store = RecordingStore::default();
    let key = CacheKey::new("trending").part(1).part(10);
    let calls = AtomicUsize::new(0);

    let produce = |value: u32| {
        let calls = &calls;
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, HuginnError>(vec![value])
        }
    };

    let first: Vec<u32> = fetch(Some(&store), &key, produce(1), TTL).await.unwrap();
    let second: Vec<u32> = fetch(Some(&store), &key, produce(2), TTL).await.unwrap();

    assert_eq!(first, vec![1]);
    assert_eq!(second, vec![1], "second call must return the cached value");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.writes.lock().unwrap().as_slice(),
        &[("trending;1;10".to_string(), TTL)]
    );
}

#[tokio::test]
async fn without_store_producer_runs_every_time() {
    let key = CacheKey::new("popular").part(1).part(10);
    let calls = AtomicUsize::new(0);

    for i in 0..3u32 {
        let value: u32 = fetch(
            None,
            &key,
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(i * 7)
            },
            TTL,
        )
        .await
        .unwrap();
        assert_eq!(value, i * 7, "result is returned unmodified");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn producer_failure_is_not_cached() {
    let store = RecordingStore::default();
    let key = CacheKey::new("watch").part("ep-1").part("gogoanime");

    let err = fetch::<u32, _, _>(
        Some(&store),
        &key,
        || async { Err(HuginnError::NotFound("ep-1".into())) },
        TTL,
    )
    .await
    .unwrap_err();

    assert!(err.is_not_found());
    assert!(store.writes.lock().unwrap().is_empty());
    assert!(store.get(key.as_str()).await.unwrap().is_none());

    // A later success is computed and cached normally.
    let value: u32 = fetch(Some(&store), &key, || async { Ok(5) }, TTL)
        .await
        .unwrap();
    assert_eq!(value, 5);
    assert_eq!(store.writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn broken_store_degrades_to_direct_computation() {
    let key = CacheKey::new("trending").part(1).part(10);
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        let value: String = fetch(
            Some(&BrokenStore),
            &key,
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("fresh".to_string())
            },
            TTL,
        )
        .await
        .unwrap();
        assert_eq!(value, "fresh");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn undecodable_entry_is_recomputed_and_overwritten() {
    let store = RecordingStore::default();
    let key = CacheKey::new("info").part("21").part(false).part(false).part("zoro");
    store
        .inner
        .set(key.as_str(), b"not json".to_vec(), TTL)
        .await
        .unwrap();

    let value: Vec<String> = fetch(Some(&store), &key, || async { Ok(vec!["ok".into()]) }, TTL)
        .await
        .unwrap();
    assert_eq!(value, vec!["ok".to_string()]);

    let cached: Vec<String> = fetch(
        Some(&store),
        &key,
        || async { Err(HuginnError::Http("should not run".into())) },
        TTL,
    )
    .await
    .unwrap();
    assert_eq!(cached, vec!["ok".to_string()]);
}

#[tokio::test]
async fn keys_are_deterministic() {
    let build = || {
        CacheKey::new("episodes")
            .part("123")
            .part(true)
            .part(false)
            .part("gogoanime")
    };
    assert_eq!(build(), build());
    assert_eq!(build().as_str(), "episodes;123;true;false;gogoanime");
}

#[tokio::test]
async fn shared_store_serves_separate_callers() {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
    let key = CacheKey::namespaced(Some("huginn"), "popular").part(2).part(20);

    let a: u32 = fetch(Some(store.as_ref()), &key, || async { Ok(1) }, TTL)
        .await
        .unwrap();
    let b: u32 = fetch(Some(store.as_ref()), &key, || async { Ok(2) }, TTL)
        .await
        .unwrap();
    assert_eq!((a, b), (1, 1));
    assert!(store.get("huginn:popular;2;20").await.unwrap().is_some());
}
