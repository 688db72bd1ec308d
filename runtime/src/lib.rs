//! qmetric runtime - process wiring for the metric filter
//!
//! Provides [`run()`] for env-driven startup, and [`RuntimeBuilder`] for
//! callers that want to override parts of the environment.
//!
//! ```text
//! stdin (NDJSON) ──► ingest ──► ChannelHost ──► StreamLoop ──► StdoutSink ──► stdout
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     qmetric_runtime::run().await
//! }
//! ```
//!
//! # Shutdown
//!
//! End of input, Ctrl+C or SIGTERM stops the ingest side. The filter then
//! drains what is already queued, the sink writes it out and the process
//! exits. Stdin is read on its own thread; a read still blocked at that
//! point is abandoned rather than awaited.

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod config;
pub mod ingest;
pub mod prelude;
pub mod sink;

use config::{LogFormat, RuntimeConfig, SinkFormat};
use qmetric_filter::{ChannelHost, FilterMetrics, StreamLoop, VERSION};
use sink::StdoutSink;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run the filter with settings from the environment
///
/// Reads NDJSON records from stdin and writes metrics to stdout until the
/// input ends or a shutdown signal arrives.
pub async fn run() -> anyhow::Result<()> {
    RuntimeBuilder::new().run().await
}

/// Builder for overriding environment settings
///
/// # Example
///
/// ```no_run
/// # async fn example() -> anyhow::Result<()> {
/// qmetric_runtime::RuntimeBuilder::new()
///     .plugin_name("metric-edge")
///     .option("limit-dimensions", "cluster,container_name")
///     .run()
///     .await
/// # }
/// ```
#[derive(Default)]
pub struct RuntimeBuilder {
    plugin_name: Option<String>,
    channel_capacity: Option<usize>,
    sink_format: Option<SinkFormat>,
    options: Vec<(String, String)>,
}

impl RuntimeBuilder {
    /// Create a builder that uses the environment for everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `QMETRIC_PLUGIN_NAME`
    pub fn plugin_name(mut self, name: impl Into<String>) -> Self {
        self.plugin_name = Some(name.into());
        self
    }

    /// Override `QMETRIC_CHANNEL_CAPACITY`
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// Override `QMETRIC_SINK_FORMAT`
    pub fn sink_format(mut self, format: SinkFormat) -> Self {
        self.sink_format = Some(format);
        self
    }

    /// Set a filter option, taking precedence over `QMETRIC_FILTER_*`
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Environment config with this builder's overrides applied
    pub fn resolve(self, mut config: RuntimeConfig) -> RuntimeConfig {
        if let Some(name) = self.plugin_name {
            config.plugin_name = name;
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }
        if let Some(format) = self.sink_format {
            config.sink_format = format;
        }
        for (key, value) in self.options {
            config.options = config.options.set(key, value);
        }
        config
    }

    /// Run to completion
    pub async fn run(self) -> anyhow::Result<()> {
        // ── 1. Load config from env ──────────────────────────────
        let config = self.resolve(RuntimeConfig::from_env()?);

        // ── 2. Init tracing ──────────────────────────────────────
        init_tracing(&config);

        info!(
            version = VERSION,
            plugin = %config.plugin_name,
            channel_capacity = config.channel_capacity,
            options = config.options.len(),
            "Starting qmetric"
        );

        // ── 3. Init stage counters ───────────────────────────────
        FilterMetrics::init()?;

        // ── 4. Build host and spawn the loop ─────────────────────
        let (records, host, metrics) = ChannelHost::builder(config.plugin_name.as_str())
            .options(config.options.clone())
            .channel_capacity(config.channel_capacity)
            .build();

        let shutdown = host.shutdown_handle();
        let mut loop_handle = tokio::spawn(StreamLoop::new(host).run());

        let sink = StdoutSink::new(config.sink_format);
        let sink_handle = tokio::spawn(async move { sink.drain(metrics).await });

        let ingest_handle = std::thread::Builder::new()
            .name("qmetric-stdin".to_string())
            .spawn(move || ingest::forward_lines(std::io::stdin().lock(), records))?;

        // ── 5. Wait for the loop or a signal ─────────────────────
        let loop_result = tokio::select! {
            res = &mut loop_handle => res,
            _ = shutdown_signal() => {
                shutdown.shutdown();
                loop_handle.await
            }
        };

        // ── 6. Shutdown ──────────────────────────────────────────
        if ingest_handle.is_finished() {
            match ingest_handle.join() {
                Ok(Ok(forwarded)) => debug!(forwarded, "Input thread finished"),
                Ok(Err(e)) => warn!(error = %e, "Input failed"),
                Err(_) => warn!("Input thread panicked"),
            }
        } else {
            debug!("Input thread still blocked on stdin, leaving it behind");
        }
        match sink_handle.await? {
            Ok(written) => info!(written, "Sink drained"),
            Err(e) => warn!(error = %e, "Sink stopped early"),
        }
        debug!(counters = %qmetric_filter::metrics::gather(), "Stage counters");
        loop_result??;

        info!("qmetric shutdown complete");
        Ok(())
    }
}

/// Initialise the tracing subscriber based on config.
fn init_tracing(config: &RuntimeConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.filter_directive()));

    // Logs go to stderr, stdout carries metrics
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
