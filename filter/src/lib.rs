//! qmetric-filter - turns tagged messages into normalized gauges
//!
//! The filter sits between collectors that emit tagged messages and
//! consumers that want metrics with a stable label set.
//!
//! # Data Flow
//!
//! ```text
//! Host::recv ──► StreamLoop ──► TransformPipeline ──► Host::send
//!                                  │
//!                                  ├─ decode      name / time / value
//!                                  ├─ dimensions  assemble, rewrite, limit
//!                                  └─ inline tags
//! ```
//!
//! The loop talks to the outside world only through the [`Host`] trait.
//! [`ChannelHost`] is the in-process implementation backed by tokio channels.
//!
//! # Example
//!
//! ```
//! use qmetric_core::Message;
//! use qmetric_filter::{ChannelHost, StreamLoop};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), qmetric_filter::PluginError> {
//! let (records, host, mut metrics) = ChannelHost::builder("metric").build();
//! let task = tokio::spawn(StreamLoop::new(host).run());
//!
//! records
//!     .send(
//!         Message::new("collector")
//!             .with_tag("name", "cpu")
//!             .with_tag("time", "1000000000")
//!             .with_tag("value", "0.42"),
//!     )
//!     .await?;
//! drop(records);
//!
//! let met = metrics.recv().await.ok_or(qmetric_filter::PluginError::Closed)?;
//! assert_eq!(met.dimension("source"), Some("collector"));
//! # task.await.map_err(|e| qmetric_filter::PluginError::Send(e.to_string()))??;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod config;
pub mod decode;
pub mod dimensions;
pub mod error;
pub mod host;
pub mod metrics;
pub mod pipeline;
pub mod runner;

pub use config::{FilterConfig, PluginOptions};
pub use decode::{Decoded, decode};
pub use dimensions::{LimitKeys, RewriteRules};
pub use error::{DecodeError, PluginError};
pub use host::{ChannelHost, ChannelHostBuilder, RecordSender, ShutdownHandle};
pub use metrics::FilterMetrics;
pub use pipeline::{Disposition, TransformPipeline};
pub use runner::{StreamLoop, VERSION};

pub use qmetric_core::{Dimensions, Host, LogLevel, Metric, Record};
