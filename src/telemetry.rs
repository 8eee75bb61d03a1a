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
//! - `provider`: resolved provider name (e.g. "gogoanime", "crunchyroll")
//! - `operation`: gateway operation (e.g. "trending", "episodes", "watch")
//! - `status`: outcome: "ok" or "error"

/// Total gateway operations served.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "huginn_requests_total";

/// Gateway operation duration in seconds, cache lookups included.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "huginn_request_duration_seconds";

/// Total cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total cache misses (the producer was invoked).
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Cache store reads or writes that failed and were degraded to a miss.
///
/// Labels: `operation`, `direction` ("read" | "write").
pub const CACHE_ERRORS_TOTAL: &str = "huginn_cache_errors_total";

/// Session acquisitions for session-requiring providers.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const SESSIONS_TOTAL: &str = "huginn_sessions_total";

/// Proxy draws made while constructing provider instances.
///
/// Labels: `egress` ("proxied" | "direct").
pub const PROXY_SELECTIONS_TOTAL: &str = "huginn_proxy_selections_total";
