//! Prometheus metrics for the metric filter

use crate::error::PluginError;
use prometheus::{CounterVec, Encoder, TextEncoder, register_counter_vec};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Global metrics instance
static METRICS: OnceLock<FilterMetrics> = OnceLock::new();

/// Serializes registration so concurrent callers never register twice
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Drop reasons, as used for the `reason` label
pub mod reason {
    /// A required tag was missing
    pub const INCOMPLETE: &str = "incomplete";
    /// `value` or `time` did not parse
    pub const DECODE_ERROR: &str = "decode_error";
    /// The stop-processing guard rejected the message
    pub const STOPPED: &str = "stopped";
    /// The record shape is not handled
    pub const UNHANDLED: &str = "unhandled";
}

/// All filter metrics
pub struct FilterMetrics {
    /// Records received (by plugin, record class: message, container or other)
    pub records_received: CounterVec,

    /// Metrics sent downstream (by plugin)
    pub metrics_emitted: CounterVec,

    /// Records that produced no metric (by plugin, reason)
    pub records_dropped: CounterVec,
}

impl FilterMetrics {
    /// Initialize metrics (call once at startup)
    ///
    /// Returns error if metric registration fails.
    pub fn init() -> Result<&'static FilterMetrics, PluginError> {
        let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(metrics) = METRICS.get() {
            return Ok(metrics);
        }

        let metrics = FilterMetrics {
            records_received: register_counter_vec!(
                "qmetric_records_received_total",
                "Total records received on the inbound channel",
                &["plugin", "kind"]
            )
            .map_err(|e| PluginError::Metrics(format!("records_received: {e}")))?,

            metrics_emitted: register_counter_vec!(
                "qmetric_metrics_emitted_total",
                "Total metrics sent downstream",
                &["plugin"]
            )
            .map_err(|e| PluginError::Metrics(format!("metrics_emitted: {e}")))?,

            records_dropped: register_counter_vec!(
                "qmetric_records_dropped_total",
                "Total records that produced no metric",
                &["plugin", "reason"]
            )
            .map_err(|e| PluginError::Metrics(format!("records_dropped: {e}")))?,
        };

        let _ = METRICS.set(metrics);

        METRICS
            .get()
            .ok_or_else(|| PluginError::Metrics("Failed to initialize metrics".to_string()))
    }

    /// Get the global metrics instance
    ///
    /// Returns None if metrics haven't been initialized yet.
    pub fn get() -> Option<&'static FilterMetrics> {
        METRICS.get()
    }

    /// Record a received record
    pub fn record_received(&self, plugin: &str, kind: &str) {
        self.records_received
            .with_label_values(&[plugin, kind])
            .inc();
    }

    /// Record an emitted metric
    pub fn record_emitted(&self, plugin: &str) {
        self.metrics_emitted.with_label_values(&[plugin]).inc();
    }

    /// Record a dropped record
    pub fn record_dropped(&self, plugin: &str, reason: &str) {
        self.records_dropped
            .with_label_values(&[plugin, reason])
            .inc();
    }
}

/// Gather all metrics and encode as Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_ok() {
        String::from_utf8(buffer).unwrap_or_default()
    } else {
        String::new()
    }
}

/// Record a received record if metrics are initialized
pub fn try_record_received(plugin: &str, kind: &str) {
    if let Some(m) = FilterMetrics::get() {
        m.record_received(plugin, kind);
    }
}

/// Record an emitted metric if metrics are initialized
pub fn try_record_emitted(plugin: &str) {
    if let Some(m) = FilterMetrics::get() {
        m.record_emitted(plugin);
    }
}

/// Record a dropped record if metrics are initialized
pub fn try_record_dropped(plugin: &str, reason: &str) {
    if let Some(m) = FilterMetrics::get() {
        m.record_dropped(plugin, reason);
    }
}
