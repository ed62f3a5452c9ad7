//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};

use huginn::cache::{CacheConfig, MemoryStore, ResponseCache};
use huginn::providers::{CompletionProvider, FailureClass, RetryConfig, RetryingTransport};
use huginn::telemetry;

// ============================================================================
// Mock provider
// ============================================================================

struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Value, FailureClass>>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<Value, FailureClass>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str) -> Result<Value, FailureClass> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider called more times than scripted")
    }
}

fn transport(provider: Arc<ScriptedProvider>) -> RetryingTransport<Arc<ScriptedProvider>> {
    let cache = Arc::new(ResponseCache::new(
        Arc::new(MemoryStore::new()),
        &CacheConfig::default(),
    ));
    RetryingTransport::new(
        provider,
        cache,
        RetryConfig::new()
            .max_attempts(3)
            .backoff_base(Duration::from_millis(1)),
        512,
    )
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

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

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread
/// runtime. `block_in_place` ensures the sync `with_local_recorder`
/// closure stays on the current thread while `block_on` drives the
/// inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_miss_then_hit_records_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let cache = ResponseCache::new(
                    Arc::new(MemoryStore::new()),
                    &CacheConfig::default(),
                );
                assert!(cache.lookup("prompt").await.is_none());
                cache.store("prompt", "reply").await;
                assert!(cache.lookup("prompt").await.is_some());
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_call_records_request_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let provider =
                    ScriptedProvider::new(vec![Ok(json!({"generated_text": "a reply"}))]);
                transport(provider).send("hello").await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 0);
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn transient_failure_records_retry_counter() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let provider = ScriptedProvider::new(vec![
                    Err(FailureClass::ServerError(502)),
                    Ok(json!({"generated_text": "recovered"})),
                ]);
                transport(provider).send("hello").await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
}
