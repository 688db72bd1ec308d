//! Records as they arrive on the inbound channel

use crate::message::{ContainerMessage, Message};

/// One inbound item, classified by shape
///
/// The filter only understands the first two variants. Everything else the
/// host puts on the channel (engine events, other plugins' output, ...)
/// arrives as [`Record::Other`] and is skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A plain tagged message
    Message(Message),
    /// A tagged message with container and engine descriptors
    Container(ContainerMessage),
    /// Any shape the filter does not handle
    Other {
        /// Name of the shape, for diagnostics
        kind: String,
    },
}

impl Record {
    /// Build an unrecognized record of the given shape
    pub fn other(kind: impl Into<String>) -> Self {
        Self::Other { kind: kind.into() }
    }

    /// Variant name: `message`, `container` or `other`
    ///
    /// Unlike [`Record::kind`], this never carries input text.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Container(_) => "container",
            Self::Other { .. } => "other",
        }
    }

    /// Name of the record's shape
    pub fn kind(&self) -> &str {
        match self {
            Self::Message(_) => "message",
            Self::Container(_) => "container",
            Self::Other { kind } => kind,
        }
    }
}

impl From<Message> for Record {
    fn from(msg: Message) -> Self {
        Self::Message(msg)
    }
}

impl From<ContainerMessage> for Record {
    fn from(msg: ContainerMessage) -> Self {
        Self::Container(msg)
    }
}
