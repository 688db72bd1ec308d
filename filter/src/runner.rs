//! Stream loop - receives records and sends metrics
//!
//! One loop per plugin instance. Records are handled strictly one at a
//! time, so metrics leave in the order records arrived. A record that
//! cannot be turned into a metric is dropped and the loop moves on; only
//! a failed outbound send ends it early.

use crate::config::FilterConfig;
use crate::error::PluginError;
use crate::metrics::{self, FilterMetrics, reason};
use crate::pipeline::{Disposition, TransformPipeline};
use qmetric_core::{Host, LogLevel, Record};

/// Crate version, logged on start
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plugin package name
pub const PLUGIN_PKG: &str = "metric";

/// Receive/dispatch loop over a [`Host`]
pub struct StreamLoop<H: Host> {
    host: H,
    pipeline: TransformPipeline,
}

impl<H: Host> StreamLoop<H> {
    /// Read the filter options from the host and prepare the pipeline
    pub fn new(host: H) -> Self {
        let config = FilterConfig::from_host(&host);
        Self::with_config(host, config)
    }

    /// Use an explicit configuration instead of the host's options
    pub fn with_config(host: H, config: FilterConfig) -> Self {
        let pipeline = TransformPipeline::new(host.name(), config);
        Self { host, pipeline }
    }

    /// The configuration in use
    pub fn config(&self) -> &FilterConfig {
        self.pipeline.config()
    }

    /// Run until the inbound channel closes
    ///
    /// # Errors
    /// Returns the host's error if a metric cannot be sent.
    pub async fn run(mut self) -> Result<(), PluginError> {
        if let Err(e) = FilterMetrics::init() {
            self.host.log(LogLevel::Warn, &format!("Metrics unavailable: {e}"));
        }
        self.host
            .log(LogLevel::Notice, &format!("Start plugin v{VERSION}"));

        while let Some(record) = self.host.recv().await {
            self.dispatch(record).await?;
        }

        self.host.log(LogLevel::Debug, "Inbound channel closed");
        Ok(())
    }

    /// Handle one record
    async fn dispatch(&self, record: Record) -> Result<(), PluginError> {
        let plugin = self.pipeline.plugin();
        metrics::try_record_received(plugin, record.class());

        match self.pipeline.transform(&record) {
            Ok(Disposition::Emit(met)) => {
                if matches!(record, Record::Container(_)) {
                    self.host.log(
                        LogLevel::Debug,
                        &format!("Limit dimensions to {:?}", self.config().limit.keys()),
                    );
                }
                self.host.log(LogLevel::Trace, "send metric");
                self.host.send(met).await?;
                metrics::try_record_emitted(plugin);
            }
            Ok(Disposition::Stopped) => {
                metrics::try_record_dropped(plugin, reason::STOPPED);
            }
            Ok(Disposition::Incomplete) => {
                metrics::try_record_dropped(plugin, reason::INCOMPLETE);
            }
            Ok(Disposition::Unhandled(kind)) => {
                if !self.config().ignore_container_events {
                    self.host.log(
                        LogLevel::Trace,
                        &format!("No handler for record of kind '{kind}'"),
                    );
                }
                metrics::try_record_dropped(plugin, reason::UNHANDLED);
            }
            Err(e) => {
                self.host.log(LogLevel::Error, &e.to_string());
                metrics::try_record_dropped(plugin, reason::DECODE_ERROR);
            }
        }
        Ok(())
    }
}
