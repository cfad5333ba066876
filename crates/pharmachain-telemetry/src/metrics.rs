//! # Prometheus Metrics
//!
//! Ledger-level metrics exposed in the Prometheus text format.
//!
//! ## Metric Naming Convention
//!
//! `pc_<component>_<metric>_<unit>`, e.g. `pc_ledger_operations_total`.

use crate::TelemetryError;
use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Instant;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LEDGER
    // =========================================================================

    /// Requests handled, by operation and outcome (ok or an error kind)
    pub static ref LEDGER_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("pc_ledger_operations_total", "Ledger requests by operation and outcome"),
        &["op", "outcome"]
    ).expect("metric creation failed");

    /// Batches created
    pub static ref BATCHES_CREATED: Counter = Counter::new(
        "pc_ledger_batches_created_total",
        "Total batches registered on the ledger"
    ).expect("metric creation failed");

    /// Batches recalled
    pub static ref BATCHES_RECALLED: Counter = Counter::new(
        "pc_ledger_batches_recalled_total",
        "Total recall events recorded"
    ).expect("metric creation failed");

    /// Request handling latency
    pub static ref REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("pc_ledger_request_duration_seconds", "Time to handle one request")
            .buckets(vec![0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1]),
        &["op"]
    ).expect("metric creation failed");

    /// Last committed journal sequence
    pub static ref JOURNAL_SEQUENCE: Gauge = Gauge::new(
        "pc_ledger_journal_sequence",
        "Sequence number of the last journalled event"
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS
    // =========================================================================

    /// Events published on the bus, by event name
    pub static ref EVENTS_PUBLISHED: CounterVec = CounterVec::new(
        Opts::new(
            "pc_eventbus_events_published_total",
            "Events published on the bus, as seen by the audit subscriber"
        ),
        &["event"]
    ).expect("metric creation failed");

    /// Events the audit subscriber missed because it fell behind
    pub static ref EVENTS_LAGGED: Counter = Counter::new(
        "pc_eventbus_events_lagged_total",
        "Events skipped by a lagging subscriber"
    ).expect("metric creation failed");

    // =========================================================================
    // INGRESS
    // =========================================================================

    /// Input lines that could not be decoded into a request
    pub static ref DECODE_FAILURES: Counter = Counter::new(
        "pc_ingress_decode_failures_total",
        "Request lines rejected before reaching the ledger"
    ).expect("metric creation failed");
}

/// Handle returned by [`register_metrics`].
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle;

fn register<M>(metric: M) -> Result<(), TelemetryError>
where
    M: prometheus::core::Collector + 'static,
{
    match REGISTRY.register(Box::new(metric)) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(TelemetryError::MetricsInit(e.to_string())),
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    register(LEDGER_OPERATIONS.clone())?;
    register(BATCHES_CREATED.clone())?;
    register(BATCHES_RECALLED.clone())?;
    register(REQUEST_DURATION.clone())?;
    register(JOURNAL_SEQUENCE.clone())?;
    register(EVENTS_PUBLISHED.clone())?;
    register(EVENTS_LAGGED.clone())?;
    register(DECODE_FAILURES.clone())?;

    tracing::debug!("Prometheus metrics registered");
    Ok(MetricsHandle)
}

/// Encode all metrics in Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count one handled request.
pub fn record_operation(op: &str, outcome: &str) {
    LEDGER_OPERATIONS.with_label_values(&[op, outcome]).inc();
}

/// Timer that records elapsed seconds into a histogram on drop.
pub struct HistogramTimer {
    histogram: prometheus::Histogram,
    start: Instant,
}

impl HistogramTimer {
    /// Start timing against `histogram`.
    pub fn new(histogram: prometheus::Histogram) -> Self {
        Self {
            histogram,
            start: Instant::now(),
        }
    }

    /// Start timing a request for `op`.
    pub fn for_op(op: &str) -> Self {
        Self::new(REQUEST_DURATION.with_label_values(&[op]))
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
