//! Tests for [`TokenizerCache`] — bounded LRU memo of loaded tokenizers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use tokenlens::telemetry;
use tokenlens::{
    CacheConfig, DecodeCapability, EncodeCapability, Encoding, Result, TokenLensError,
    TokenizerCache, TokenizerLoader, TokenizerProvider,
};

// ============================================================================
// Fakes
// ============================================================================

/// Tokenizer that decodes everything to its model name.
struct NamedTokenizer {
    name: String,
}

impl EncodeCapability for NamedTokenizer {
    fn encode(&self, _text: &str) -> Result<Encoding> {
        Ok(Encoding::default())
    }
}

impl DecodeCapability for NamedTokenizer {
    fn decode(&self, _ids: &[u32]) -> Result<String> {
        Ok(self.name.clone())
    }
}

/// Loader that records every load and fails for ids starting with `missing`.
#[derive(Default)]
struct CountingLoader {
    loads: Mutex<Vec<String>>,
}

impl CountingLoader {
    fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }
}

impl TokenizerLoader for CountingLoader {
    fn load(&self, model_id: &str) -> Result<Arc<dyn TokenizerProvider>> {
        self.loads.lock().unwrap().push(model_id.to_string());
        if model_id.starts_with("missing") {
            return Err(TokenLensError::model_load(
                model_id,
                "Repository Not Found for url: https://huggingface.co/missing",
            ));
        }
        if model_id == "misconfigured" {
            return Err(TokenLensError::Configuration("no tokenizer.json".into()));
        }
        Ok(Arc::new(NamedTokenizer {
            name: model_id.to_string(),
        }))
    }
}

fn cache_with(max_models: u64) -> (Arc<CountingLoader>, TokenizerCache) {
    let loader = Arc::new(CountingLoader::default());
    let cache = TokenizerCache::new(loader.clone(), &CacheConfig::new().max_models(max_models));
    (loader, cache)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn default_capacity_is_ten() {
    assert_eq!(CacheConfig::default().max_models, 10);
    let (_, cache) = cache_with(CacheConfig::default().max_models);
    assert_eq!(cache.capacity(), 10);
}

#[test]
fn repeated_resolution_loads_once() {
    let (loader, cache) = cache_with(10);

    let first = cache.resolve("gpt2").unwrap();
    let second = cache.resolve("gpt2").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(loader.loads(), vec!["gpt2"]);
    assert_eq!(first.decode(&[]).unwrap(), "gpt2");
}

#[test]
fn distinct_models_are_independent() {
    let (loader, cache) = cache_with(10);

    assert_eq!(cache.resolve("alpha").unwrap().decode(&[1]).unwrap(), "alpha");
    assert_eq!(cache.resolve("beta").unwrap().decode(&[1]).unwrap(), "beta");
    assert!(cache.contains("alpha"));
    assert!(cache.contains("beta"));
    assert!(!cache.contains("gamma"));
    assert_eq!(cache.len(), 2);
    assert_eq!(loader.loads().len(), 2);
}

#[test]
fn least_recently_used_model_is_evicted() {
    let (loader, cache) = cache_with(2);

    cache.resolve("a").unwrap();
    cache.resolve("b").unwrap();
    cache.flush();

    // Touch "a" so "b" becomes least recently used.
    cache.resolve("a").unwrap();
    cache.flush();

    cache.resolve("c").unwrap();
    cache.flush();

    assert_eq!(cache.len(), 2);
    assert!(cache.contains("a"));
    assert!(cache.contains("c"));
    assert!(!cache.contains("b"));

    cache.resolve("b").unwrap();
    assert_eq!(loader.loads(), vec!["a", "b", "c", "b"]);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let (loader, cache) = cache_with(0);
    assert_eq!(cache.capacity(), 1);

    cache.resolve("only").unwrap();
    cache.flush();
    cache.resolve("only").unwrap();
    assert_eq!(loader.loads(), vec!["only"]);
}

#[test]
fn load_failure_is_model_load_error() {
    let (_, cache) = cache_with(10);

    let err = match cache.resolve("missing/model") {
        Ok(_) => panic!("expected load failure"),
        Err(e) => e,
    };
    match &err {
        TokenLensError::ModelLoad { model, message } => {
            assert_eq!(model, "missing/model");
            assert!(message.contains("Repository Not Found"));
        }
        other => panic!("expected ModelLoad, got {other:?}"),
    }
    assert!(err.is_client_error());
    assert!(err.to_string().starts_with("Failed to load model missing/model: "));
}

#[test]
fn other_loader_errors_become_model_load_errors() {
    let (_, cache) = cache_with(10);

    let err = cache.resolve("misconfigured").err().expect("load should fail");
    match err {
        TokenLensError::ModelLoad { model, message } => {
            assert_eq!(model, "misconfigured");
            assert_eq!(message, "configuration error: no tokenizer.json");
        }
        other => panic!("expected ModelLoad, got {other:?}"),
    }
}

#[test]
fn failed_loads_are_not_cached() {
    let (loader, cache) = cache_with(10);

    assert!(cache.resolve("missing").is_err());
    assert!(cache.resolve("missing").is_err());

    assert!(!cache.contains("missing"));
    assert_eq!(loader.loads(), vec!["missing", "missing"]);
    assert!(cache.is_empty());
}

#[test]
fn invalidate_all_forces_reload() {
    let (loader, cache) = cache_with(10);

    cache.resolve("gpt2").unwrap();
    cache.invalidate_all();
    assert!(cache.is_empty());

    cache.resolve("gpt2").unwrap();
    assert_eq!(loader.loads(), vec!["gpt2", "gpt2"]);
}

#[test]
fn concurrent_resolution_yields_complete_tokenizers() {
    let loads = Arc::new(AtomicUsize::new(0));

    struct SlowLoader {
        loads: Arc<AtomicUsize>,
    }

    impl TokenizerLoader for SlowLoader {
        fn load(&self, model_id: &str) -> Result<Arc<dyn TokenizerProvider>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(std::time::Duration::from_millis(20));
            Ok(Arc::new(NamedTokenizer {
                name: model_id.to_string(),
            }))
        }
    }

    let cache = Arc::new(TokenizerCache::new(
        Arc::new(SlowLoader {
            loads: Arc::clone(&loads),
        }),
        &CacheConfig::default(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.resolve("shared").unwrap().decode(&[0]).unwrap())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().expect("thread panicked"), "shared");
    }
    assert!(loads.load(Ordering::SeqCst) >= 1);
    assert_eq!(cache.len(), 1);
}

// ============================================================================
// Metrics
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

#[test]
fn hits_misses_and_loads_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let (_, cache) = cache_with(10);

    metrics::with_local_recorder(&recorder, || {
        cache.resolve("gpt2").unwrap();
        cache.resolve("gpt2").unwrap();
        cache.resolve("gpt2").unwrap();
        let _ = cache.resolve("missing");
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::MODEL_LOADS_TOTAL), 2);
}
