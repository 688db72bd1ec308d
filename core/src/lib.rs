//! qmetric-core - Core types for the qmetric filter
//!
//! This crate provides the types shared between the metric filter and
//! whatever runtime hosts it:
//!
//! - [`Record`] - an inbound item, classified by shape
//! - [`Message`] / [`ContainerMessage`] - the tagged envelopes the filter reads
//! - [`ContainerDescriptor`] / [`EngineDescriptor`] - engine inspection data
//! - [`Metric`] - the normalized record the filter emits
//! - [`Host`] trait - config, logging and channel access supplied by the runtime
//! - [`PluginError`] - error type for plugin operations
//! - [`keys`] - well-known label keys and dimension names
//!
//! # Why this crate exists
//!
//! A runtime that feeds records to the filter needs the record types, and
//! the filter needs the `Host` trait the runtime implements. Keeping both
//! here lets either side be replaced without depending on the other:
//!
//! ```text
//! qmetric-core ◄── qmetric-filter
//!     ▲                 ▲
//!     └──────────── qmetric-runtime
//! ```

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(missing_docs)]

mod container;
mod error;
mod host;
/// Well-known label keys and dimension names
pub mod keys;
/// Message envelopes carried on the data channel
pub mod message;
mod metric;
mod record;

pub use container::{ContainerConfig, ContainerDescriptor, EngineDescriptor, SwarmInfo};
pub use error::PluginError;
pub use host::{Host, LogLevel};
pub use message::{ContainerMessage, Message, SourcePath, Tags};
pub use metric::{Dimensions, Metric, MetricKind};
pub use record::Record;
