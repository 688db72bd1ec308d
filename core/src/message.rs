//! Message envelopes carried on the data channel
//!
//! A [`Message`] is a bag of string tags plus the list of plugins it has
//! passed through. A [`ContainerMessage`] is the same envelope with the
//! container and engine that produced it attached.
//!
//! # Provenance
//!
//! ```text
//! collector ──► docker-stats ──► metric filter
//!
//! source_path = ["collector", "docker-stats"]
//! last source = "docker-stats"
//! ```
//!
//! Each plugin that forwards a message appends its own name, so the path
//! doubles as a loop guard: a plugin never processes a message it has
//! already handled.

use crate::container::{ContainerDescriptor, EngineDescriptor};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Plugin names a message has passed through, oldest first - inline up to 4
pub type SourcePath = SmallVec<[String; 4]>;

/// String tags carried by every message
pub type Tags = HashMap<String, String>;

/// The generic tagged message
///
/// # Example
///
/// ```
/// use qmetric_core::Message;
///
/// let msg = Message::new("collector")
///     .with_tag("name", "cpu")
///     .with_tag("value", "0.42");
/// assert_eq!(msg.last_source(), "collector");
/// assert_eq!(msg.tag("name"), Some("cpu"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Plugins this message has passed through
    #[serde(default)]
    pub source_path: SourcePath,

    /// Tag mapping (`name`, `time`, `value`, optional `tags`, ...)
    #[serde(default)]
    pub tags: Tags,
}

impl Message {
    /// Create a message originating from `source`
    pub fn new(source: impl Into<String>) -> Self {
        let mut source_path = SourcePath::new();
        source_path.push(source.into());
        Self {
            source_path,
            tags: Tags::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Append a hop to the provenance path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_path.push(source.into());
        self
    }

    /// Look up a tag
    #[inline]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// The most recent hop, or `""` for a message with no provenance
    pub fn last_source(&self) -> &str {
        self.source_path.last().map(String::as_str).unwrap_or("")
    }

    /// Check whether `plugin` already handled this message
    pub fn passed_through(&self, plugin: &str) -> bool {
        self.source_path.iter().any(|s| s == plugin)
    }

    /// Decide whether `plugin` should leave this message alone
    ///
    /// Returns `true` if:
    /// - the plugin already appears in the provenance path, OR
    /// - `inputs` is non-empty and the last source is not one of them
    ///
    /// The message is not modified.
    pub fn stop_processing(&self, plugin: &str, inputs: &[String]) -> bool {
        if self.passed_through(plugin) {
            return true;
        }
        !inputs.is_empty() && !inputs.iter().any(|i| i == self.last_source())
    }
}

/// A message that carries the container and engine it came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerMessage {
    /// Tags and provenance
    #[serde(flatten)]
    pub message: Message,

    /// The container the message describes
    #[serde(default)]
    pub container: ContainerDescriptor,

    /// The engine running that container
    #[serde(default)]
    pub engine: EngineDescriptor,
}

impl ContainerMessage {
    /// Attach container and engine descriptors to a message
    pub fn new(message: Message, container: ContainerDescriptor, engine: EngineDescriptor) -> Self {
        Self {
            message,
            container,
            engine,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::new("collector").with_tag("name", "cpu");

        assert_eq!(msg.source_path.as_slice(), &["collector".to_string()]);
        assert_eq!(msg.tag("name"), Some("cpu"));
        assert!(msg.tag("value").is_none());
    }

    #[test]
    fn test_last_source() {
        let msg = Message::new("a").with_source("b").with_source("c");
        assert_eq!(msg.last_source(), "c");

        let empty = Message::default();
        assert_eq!(empty.last_source(), "");
    }

    #[test]
    fn test_stop_processing_loop_guard() {
        let msg = Message::new("collector").with_source("metric");
        assert!(msg.stop_processing("metric", &[]));
        assert!(!msg.stop_processing("other", &[]));
    }

    #[test]
    fn test_stop_processing_inputs() {
        let msg = Message::new("collector");
        let inputs = vec!["docker-stats".to_string()];
        assert!(msg.stop_processing("metric", &inputs));

        let msg = msg.with_source("docker-stats");
        assert!(!msg.stop_processing("metric", &inputs));
    }

    #[test]
    fn test_stop_processing_is_non_destructive() {
        let msg = Message::new("collector").with_tag("name", "cpu");
        let before = msg.clone();
        let _ = msg.stop_processing("metric", &["x".to_string()]);
        assert_eq!(msg, before);
    }

    #[test]
    fn test_message_json_shape() {
        let json = r#"{"source_path": ["a", "b"], "tags": {"name": "cpu"}}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.last_source(), "b");
        assert_eq!(msg.tag("name"), Some("cpu"));
    }

    #[test]
    fn test_container_message_json_shape() {
        let json = r#"{
            "source_path": ["docker-stats"],
            "tags": {"name": "cpu"},
            "container": {"Id": "c1", "Name": "/web1"},
            "engine": {"Name": "swarm1"}
        }"#;
        let msg: ContainerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.message.last_source(), "docker-stats");
        assert_eq!(msg.container.id, "c1");
        assert_eq!(msg.engine.name, "swarm1");
    }
}
