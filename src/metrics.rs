//! Prometheus metrics for the gateway.
//!
//! This module provides metrics for:
//! - Remote call latency, per operation
//! - Bets placed
//! - Bets rejected, per business error kind
//! - Internal errors

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{debug, warn};

use crate::error::BusinessError;

// === Metric Name Constants ===

/// Remote call latency metric name.
pub const METRIC_REMOTE_CALL_LATENCY: &str = "remote_call_latency_ms";
/// Bets placed counter metric name.
pub const METRIC_BETS_PLACED: &str = "bets_placed_total";
/// Bets rejected counter metric name.
pub const METRIC_BETS_REJECTED: &str = "bets_rejected_total";
/// Internal errors counter metric name.
pub const METRIC_INTERNAL_ERRORS: &str = "internal_errors_total";

/// Remote catalog fetch.
pub const OP_CATALOG: &str = "catalog";
/// Remote bet placement.
pub const OP_PLACEMENT: &str = "placement";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_REMOTE_CALL_LATENCY,
        "Remote betting API call latency in milliseconds"
    );
    describe_counter!(METRIC_BETS_PLACED, "Total number of bets forwarded and accepted");
    describe_counter!(
        METRIC_BETS_REJECTED,
        "Total number of bets rejected with a business error"
    );
    describe_counter!(
        METRIC_INTERNAL_ERRORS,
        "Total number of requests failed by an internal error"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and return a handle for rendering.
///
/// Returns `None` if a recorder is already installed.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Record latency of a remote call.
pub fn record_remote_call_latency(operation: &'static str, start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_REMOTE_CALL_LATENCY, "operation" => operation).record(latency_ms);
}

/// Record a successfully placed bet.
pub fn record_bet_placed() {
    counter!(METRIC_BETS_PLACED).increment(1);
}

/// Record a business rejection.
pub fn record_bet_rejected(kind: BusinessError) {
    counter!(METRIC_BETS_REJECTED, "kind" => kind.as_label()).increment(1);
}

/// Record an internal error.
pub fn record_internal_error() {
    counter!(METRIC_INTERNAL_ERRORS).increment(1);
}
