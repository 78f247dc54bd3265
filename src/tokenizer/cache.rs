//! Bounded memo of loaded tokenizers, keyed on model identifier.
//!
//! Loading a tokenizer can mean a Hub download plus parsing a multi-megabyte
//! `tokenizer.json`, so [`TokenizerCache`] keeps the most recently used
//! models resident. Capacity is fixed at construction and the least recently
//! used model is evicted once it is exceeded.
//!
//! Concurrent misses for the same identifier are coalesced by moka; a
//! caller only ever observes a fully constructed tokenizer. Failed loads are
//! never cached, so a transient Hub failure is retried on the next request.

use std::sync::Arc;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::Deserialize;
use tracing::{info, warn};

use super::{TokenizerLoader, TokenizerProvider};
use crate::error::{Result, TokenLensError};
use crate::telemetry;

/// Configuration for the tokenizer cache.
///
/// ```rust
/// # use tokenlens::tokenizer::CacheConfig;
/// let config = CacheConfig::new().max_models(4);
/// assert_eq!(config.max_models, 4);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of distinct models kept loaded. Default: 10.
    #[serde(default = "default_max_models")]
    pub max_models: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_models: default_max_models(),
        }
    }
}

fn default_max_models() -> u64 {
    10
}

impl CacheConfig {
    /// Create a new config with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of loaded models.
    pub fn max_models(mut self, n: u64) -> Self {
        self.max_models = n;
        self
    }
}

/// Thread-safe LRU cache of loaded tokenizers.
pub struct TokenizerCache {
    loader: Arc<dyn TokenizerLoader>,
    entries: Cache<String, Arc<dyn TokenizerProvider>>,
    capacity: u64,
}

impl TokenizerCache {
    /// Create a cache that loads misses through `loader`.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(loader: Arc<dyn TokenizerLoader>, config: &CacheConfig) -> Self {
        let capacity = config.max_models.max(1);
        let entries = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self {
            loader,
            entries,
            capacity,
        }
    }

    /// Return the tokenizer for `model_id`, loading it on a miss.
    ///
    /// Any load failure is reported as [`TokenLensError::ModelLoad`] for
    /// `model_id`, carrying the upstream message.
    pub fn resolve(&self, model_id: &str) -> Result<Arc<dyn TokenizerProvider>> {
        if let Some(tokenizer) = self.entries.get(model_id) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            return Ok(tokenizer);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);

        self.entries
            .try_get_with(model_id.to_string(), || {
                info!(model_id, "Loading tokenizer");
                let loaded = self.loader.load(model_id);
                let status = if loaded.is_ok() { "ok" } else { "error" };
                metrics::counter!(telemetry::MODEL_LOADS_TOTAL, "status" => status).increment(1);
                loaded
            })
            .map_err(|e| {
                warn!(model_id, error = %e, "tokenizer load failed");
                match e.as_ref() {
                    TokenLensError::ModelLoad { message, .. } => {
                        TokenLensError::model_load(model_id, message)
                    }
                    other => TokenLensError::model_load(model_id, other),
                }
            })
    }

    /// Whether `model_id` is currently loaded.
    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.contains_key(model_id)
    }

    /// Number of loaded models, after applying pending evictions.
    pub fn len(&self) -> u64 {
        self.flush();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured maximum number of loaded models.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Apply pending maintenance (recency updates and evictions) now.
    pub fn flush(&self) {
        self.entries.run_pending_tasks();
    }

    /// Drop every loaded tokenizer.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        self.flush();
    }
}
