//! Error types for the metric filter

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

// Re-export PluginError from qmetric-core
pub use qmetric_core::PluginError;

/// A record had all required tags but one of them did not parse
///
/// The stream loop logs these at error level and drops the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `value` is not a floating point number
    #[error("Unable to parse value '{value}' as float: {source}")]
    Value {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// `time` is not an integer
    #[error("Unable to parse timestamp '{value}' as int: {source}")]
    Time {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// `time` parsed but cannot be represented as a timestamp
    #[error("Timestamp {0} is out of range")]
    TimeOutOfRange(i64),
}
