//! Telemetry metric name constants.
//!
//! Centralised metric names for tokenlens operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `tokenlens_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` — operation invoked ("tokenize" or "decode")
//! - `status` — outcome: "ok" or "error"

/// Total requests handled by the HTTP layer.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "tokenlens_requests_total";

/// Request duration in seconds.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "tokenlens_request_duration_seconds";

/// Total tokens emitted by encode and decode operations.
///
/// Labels: `operation`.
pub const TOKENS_TOTAL: &str = "tokenlens_tokens_total";

/// Total tokenizer cache hits.
pub const CACHE_HITS_TOTAL: &str = "tokenlens_cache_hits_total";

/// Total tokenizer cache misses.
pub const CACHE_MISSES_TOTAL: &str = "tokenlens_cache_misses_total";

/// Total tokenizer load attempts on cache misses.
///
/// Labels: `status` ("ok" | "error").
pub const MODEL_LOADS_TOTAL: &str = "tokenlens_model_loads_total";
