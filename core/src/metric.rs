//! The metric record the filter emits

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label map attached to a metric
pub type Dimensions = HashMap<String, String>;

/// Metric kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Point-in-time value
    Gauge,
}

/// A normalized metric
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use qmetric_core::{Dimensions, Metric};
///
/// let time = DateTime::from_timestamp(1_000_000_000, 0).unwrap();
/// let met = Metric::gauge("metric", "cpu", 0.42, Dimensions::new(), time);
/// assert!(met.valid);
/// assert_eq!(met.time.timestamp(), 1_000_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Name of the plugin that produced the metric
    pub plugin: String,
    /// Metric name
    pub name: String,
    /// Metric kind
    pub kind: MetricKind,
    /// Metric value
    pub value: f64,
    /// Labels
    pub dimensions: Dimensions,
    /// Observation time
    pub time: DateTime<Utc>,
    /// Whether downstream consumers should trust the value
    pub valid: bool,
}

impl Metric {
    /// Create a metric with every field specified
    pub fn new_ext(
        plugin: impl Into<String>,
        name: impl Into<String>,
        kind: MetricKind,
        value: f64,
        dimensions: Dimensions,
        time: DateTime<Utc>,
        valid: bool,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            name: name.into(),
            kind,
            value,
            dimensions,
            time,
            valid,
        }
    }

    /// Create a valid gauge
    pub fn gauge(
        plugin: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        dimensions: Dimensions,
        time: DateTime<Utc>,
    ) -> Self {
        Self::new_ext(plugin, name, MetricKind::Gauge, value, dimensions, time, true)
    }

    /// Look up a dimension
    pub fn dimension(&self, key: &str) -> Option<&str> {
        self.dimensions.get(key).map(String::as_str)
    }
}
