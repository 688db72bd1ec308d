//! Convenience re-exports for embedding the filter.
//!
//! ```rust
//! use qmetric_runtime::prelude::*;
//! ```

// Core types
pub use qmetric_core::{
    ContainerDescriptor, ContainerMessage, EngineDescriptor, Message, Metric, Record,
};

// Host seam
pub use qmetric_core::{Host, LogLevel};

// Filter
pub use qmetric_filter::{
    ChannelHost, FilterConfig, LimitKeys, PluginOptions, RecordSender, RewriteRules, ShutdownHandle,
    StreamLoop,
};

// Error types
pub use qmetric_filter::{DecodeError, PluginError};

// Runtime
pub use crate::RuntimeBuilder;
pub use crate::config::{RuntimeConfig, SinkFormat};
