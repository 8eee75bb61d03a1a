//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;

use huginn::cache::MemoryStoreConfig;
use huginn::gateway::{MetaGateway, PageQuery, ProviderQuery};
use huginn::providers::{
    MetadataProvider, ProviderDescriptor, ProviderFactory, ProxyEndpoint, ProxyPool, Session,
};
use huginn::telemetry;
use huginn::types::{Page, Payload};
use huginn::{Huginn, HuginnError, Result};

// ============================================================================
// Mock providers
// ============================================================================

struct MockProvider;

#[async_trait]
impl MetadataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_trending(&self, _page: Page) -> Result<Payload> {
        Ok(json!({ "results": [] }))
    }

    async fn fetch_stream_sources(&self, _episode_id: &str) -> Result<Payload> {
        Err(HuginnError::Api {
            status: 500,
            message: "extractor crashed".into(),
        })
    }
}

struct MockFactory;

impl ProviderFactory for MockFactory {
    fn build(
        &self,
        _descriptor: &ProviderDescriptor,
        _proxy: Option<&ProxyEndpoint>,
        _session: Option<Session>,
    ) -> Result<Box<dyn MetadataProvider>> {
        Ok(Box::new(MockProvider))
    }
}

fn gateway() -> MetaGateway {
    Huginn::builder()
        .provider_factory(Arc::new(MockFactory))
        .memory_cache(MemoryStoreConfig::default())
        .proxies(ProxyPool::new(["http://10.0.0.1:8080"]).unwrap())
        .build()
        .unwrap()
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` whose labels include `label=value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cached_operation_records_hit_and_miss() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = gateway();
                gateway.trending(&PageQuery::default()).await.unwrap();
                gateway.trending(&PageQuery::default()).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::PROXY_SELECTIONS_TOTAL, "egress", "proxied"),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_request_records_error_status() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                gateway()
                    .watch("ep-1", &ProviderQuery::default())
                    .await
            })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "operation", "watch"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn resolution_failure_is_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                gateway()
                    .servers("ep-1", &ProviderQuery::provider("nyaa"))
                    .await
            })
        })
    });
    assert!(matches!(result, Err(HuginnError::UnknownProvider(_))));

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "provider", "unknown"),
        1
    );
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn session_failure_is_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    // no session provider configured, so crunchyroll cannot resolve
    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                gateway()
                    .watch("ep-1", &ProviderQuery::provider("crunchyroll"))
                    .await
            })
        })
    });
    assert!(matches!(result, Err(HuginnError::Session(_))));

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "provider", "crunchyroll"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::SESSIONS_TOTAL, "status", "error"),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    gateway().trending(&PageQuery::default()).await.unwrap();
}
