//! Transform pipeline - one record in, at most one metric out
//!
//! # Message Flow
//!
//! ```text
//! Record::Message ──► decode ──► {source} + inline tags (",") ───────────────► Metric
//!
//! Record::Container ─► decode ──► assemble ──► rewrite ──► + source
//!                                   ──► + inline tags (" ") ──► limit ─────────► Metric
//! ```
//!
//! Rewriting and limiting apply to container messages only. Inline tags on
//! container messages are separated by spaces, on plain messages by commas.

use crate::config::FilterConfig;
use crate::decode::decode;
use crate::dimensions::{assemble, inline_pairs};
use crate::error::DecodeError;
use qmetric_core::keys::DIM_SOURCE;
use qmetric_core::{ContainerMessage, Dimensions, Message, Metric, Record};

/// Inline tag separator on plain messages
const MESSAGE_TAG_DELIMITER: char = ',';

/// Inline tag separator on container messages
const CONTAINER_TAG_DELIMITER: char = ' ';

/// What became of a record
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// The record produced a metric
    Emit(Metric),
    /// The message asked this plugin to stay away
    Stopped,
    /// A required tag was missing
    Incomplete,
    /// The record has a shape the filter does not handle
    Unhandled(String),
}

/// Builds metrics from records according to a [`FilterConfig`]
pub struct TransformPipeline {
    plugin: String,
    config: FilterConfig,
}

impl TransformPipeline {
    /// Create a pipeline for the named plugin instance
    pub fn new(plugin: impl Into<String>, config: FilterConfig) -> Self {
        Self {
            plugin: plugin.into(),
            config,
        }
    }

    /// Plugin name stamped on emitted metrics
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// The configuration in use
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Classify a record and transform it
    ///
    /// # Errors
    /// Returns a [`DecodeError`] when `value` or `time` is present but does
    /// not parse. Every other outcome is a [`Disposition`].
    pub fn transform(&self, record: &Record) -> Result<Disposition, DecodeError> {
        match record {
            Record::Message(msg) => self.transform_message(msg),
            Record::Container(msg) => self.transform_container(msg),
            Record::Other { kind } => Ok(Disposition::Unhandled(kind.clone())),
        }
    }

    /// Transform a plain message
    pub fn transform_message(&self, msg: &Message) -> Result<Disposition, DecodeError> {
        if msg.stop_processing(&self.plugin, &self.config.inputs) {
            return Ok(Disposition::Stopped);
        }
        let Some(decoded) = decode(&msg.tags)? else {
            return Ok(Disposition::Incomplete);
        };

        let mut dims = Dimensions::from([(DIM_SOURCE.to_string(), msg.last_source().to_string())]);
        if let Some(raw) = decoded.inline {
            for (key, value) in inline_pairs(raw, MESSAGE_TAG_DELIMITER) {
                dims.insert(key.to_string(), value.to_string());
            }
        }

        Ok(Disposition::Emit(Metric::gauge(
            &self.plugin,
            decoded.name,
            decoded.value,
            dims,
            decoded.time,
        )))
    }

    /// Transform a container message
    pub fn transform_container(&self, msg: &ContainerMessage) -> Result<Disposition, DecodeError> {
        let base = &msg.message;
        if base.stop_processing(&self.plugin, &self.config.inputs) {
            return Ok(Disposition::Stopped);
        }
        let Some(decoded) = decode(&base.tags)? else {
            return Ok(Disposition::Incomplete);
        };

        let mut dims = self
            .config
            .rewrite
            .apply(&assemble(&msg.container, &msg.engine));
        dims.insert(DIM_SOURCE.to_string(), base.last_source().to_string());
        if let Some(raw) = decoded.inline {
            for (key, value) in inline_pairs(raw, CONTAINER_TAG_DELIMITER) {
                dims.insert(key.to_string(), value.to_string());
            }
        }
        let dims = self.config.limit.apply(dims);

        Ok(Disposition::Emit(Metric::gauge(
            &self.plugin,
            decoded.name,
            decoded.value,
            dims,
            decoded.time,
        )))
    }
}
