//! Field decoding for tagged messages
//!
//! Every recognised record must carry `name`, `time` and `value` tags.
//! Decoding is all-or-nothing: a missing tag yields `Ok(None)` and the
//! record is dropped without a word, a tag that does not parse yields a
//! [`DecodeError`].

use crate::error::DecodeError;
use chrono::{DateTime, Utc};
use qmetric_core::Tags;
use qmetric_core::keys::{TAG_INLINE, TAG_NAME, TAG_TIME, TAG_VALUE};

/// The required fields of a message, parsed
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<'a> {
    /// Metric name
    pub name: &'a str,
    /// Observation time
    pub time: DateTime<Utc>,
    /// Metric value
    pub value: f64,
    /// Raw inline tag list, if any
    pub inline: Option<&'a str>,
}

/// Extract and parse the required tags
///
/// # Returns
/// - `Ok(Some(decoded))` when all three tags are present and parse
/// - `Ok(None)` when any required tag is missing
/// - `Err(DecodeError)` when `value` or `time` does not parse
pub fn decode(tags: &Tags) -> Result<Option<Decoded<'_>>, DecodeError> {
    let (Some(name), Some(time), Some(value)) =
        (tags.get(TAG_NAME), tags.get(TAG_TIME), tags.get(TAG_VALUE))
    else {
        return Ok(None);
    };

    let value = value.parse::<f64>().map_err(|source| DecodeError::Value {
        value: value.clone(),
        source,
    })?;

    let secs = time.parse::<i64>().map_err(|source| DecodeError::Time {
        value: time.clone(),
        source,
    })?;
    let time = DateTime::from_timestamp(secs, 0).ok_or(DecodeError::TimeOutOfRange(secs))?;

    Ok(Some(Decoded {
        name,
        time,
        value,
        inline: tags.get(TAG_INLINE).map(String::as_str),
    }))
}
