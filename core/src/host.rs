//! Host trait for qmetric plugins
//!
//! The [`Host`] trait is everything a plugin needs from the runtime that
//! loads it: option lookup, a named logger, and the two ends of the data
//! channel. Plugins depend on this trait only, so the runtime can be swapped
//! or mocked in tests.

use crate::error::PluginError;
use crate::metric::Metric;
use crate::record::Record;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Severity of a host log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    /// Per-record chatter
    Trace,
    /// Diagnostics
    Debug,
    /// Lifecycle events worth seeing by default
    Notice,
    /// Something was skipped or misconfigured
    Warn,
    /// A record was lost
    Error,
}

impl LogLevel {
    /// The level's name as the host spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Notice => "notice",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "notice" | "info" => Ok(Self::Notice),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(PluginError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

/// Host trait - the runtime side of a plugin
///
/// # Implementation Requirements
///
/// - `recv` suspends until a record is available and returns `None` once
///   every producer is gone
/// - `send` may suspend while the outbound side is full; that is the only
///   backpressure a plugin sees
/// - option lookups never fail: a missing or unparseable value yields the
///   supplied default
///
/// # Example
///
/// ```ignore
/// use qmetric_core::{Host, LogLevel};
///
/// async fn drain<H: Host>(mut host: H) {
///     while let Some(record) = host.recv().await {
///         host.log(LogLevel::Trace, &format!("got {}", record.kind()));
///     }
/// }
/// ```
#[async_trait]
pub trait Host: Send {
    /// Name of the plugin instance this host serves
    fn name(&self) -> &str;

    /// Read a string option, falling back to `default`
    fn cfg_string_or(&self, key: &str, default: &str) -> String;

    /// Read a boolean option, falling back to `default`
    fn cfg_bool_or(&self, key: &str, default: bool) -> bool;

    /// Emit a log line under the plugin's name
    fn log(&self, level: LogLevel, message: &str);

    /// Wait for the next inbound record
    ///
    /// Returns `None` when the inbound channel is closed.
    async fn recv(&mut self) -> Option<Record>;

    /// Put a metric on the outbound channel
    ///
    /// # Returns
    ///
    /// * `Ok(())` - the metric was queued
    /// * `Err(PluginError::Send(_))` - the outbound channel is gone
    async fn send(&self, metric: Metric) -> Result<(), PluginError>;
}
