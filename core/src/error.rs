//! Error types for qmetric plugins

use thiserror::Error;

/// Error type for plugin operations
///
/// Per-record problems (missing fields, unparseable numbers) never surface
/// here; the stream loop logs and drops those records. `PluginError` covers
/// the failures that concern the plugin as a whole.
///
/// # Example
///
/// ```
/// use qmetric_core::PluginError;
///
/// fn deliver() -> Result<(), PluginError> {
///     Err(PluginError::Send("receiver dropped".to_string()))
/// }
///
/// match deliver() {
///     Ok(_) => println!("delivered"),
///     Err(PluginError::Send(msg)) => println!("send failed: {}", msg),
///     Err(e) => println!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Configuration could not be read or is unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// The outbound channel refused a metric
    ///
    /// Returned when the consumer side of the data channel is gone.
    #[error("send failed: {0}")]
    Send(String),

    /// Registering or encoding the stage counters failed
    #[error("metrics error: {0}")]
    Metrics(String),

    /// The data channel was closed while the plugin still needed it
    #[error("channel closed")]
    Closed,
}
