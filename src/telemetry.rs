//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status` — outcome of a transport call: "ok" or "error"
//! - `class` — failure classification (e.g. "rate_limited", "timeout")

/// Total transport calls resolved (one per gateway cache miss).
///
/// Labels: `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "huginn_requests_total";

/// Transport call duration in seconds, including retries and backoff.
pub const REQUEST_DURATION_SECONDS: &str = "huginn_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `class`.
pub const RETRIES_TOTAL: &str = "huginn_retries_total";

/// Total response-cache hits.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total response-cache misses (includes expired entries and store errors).
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";
