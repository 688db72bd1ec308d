//! In-process host backed by tokio channels
//!
//! ```text
//! producers ──► RecordSender ──► [mpsc] ──► ChannelHost::recv
//!                                               │
//!                          ChannelHost::send ──► [mpsc] ──► metric consumer
//! ```
//!
//! Both channels are bounded. Cloning the [`RecordSender`] fans several
//! producers into one filter. The filter sees end-of-stream once every
//! sender is dropped, or once a [`ShutdownHandle`] fires. In both cases
//! records already queued are still delivered.

use crate::config::PluginOptions;
use crate::error::PluginError;
use async_trait::async_trait;
use qmetric_core::{Host, LogLevel, Metric, Record};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, error, info, trace, warn};

/// Default bound for both channels
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Builder for a [`ChannelHost`] and its channel ends
pub struct ChannelHostBuilder {
    name: String,
    options: PluginOptions,
    channel_capacity: usize,
}

impl ChannelHostBuilder {
    /// Start a host for the named plugin instance
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: PluginOptions::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Options served through `cfg_string_or` / `cfg_bool_or`
    pub fn options(mut self, options: PluginOptions) -> Self {
        self.options = options;
        self
    }

    /// Set one option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.set(key, value);
        self
    }

    /// Bound for the inbound and outbound channels
    ///
    /// Values below 1 are raised to 1.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Build the host
    ///
    /// Returns the sender for inbound records, the host itself and the
    /// receiving end of the metric channel.
    pub fn build(self) -> (RecordSender, ChannelHost, mpsc::Receiver<Metric>) {
        let (record_tx, record_rx) = mpsc::channel(self.channel_capacity);
        let (metric_tx, metric_rx) = mpsc::channel(self.channel_capacity);

        let host = ChannelHost {
            name: self.name,
            options: self.options,
            rx: record_rx,
            tx: metric_tx,
            shutdown: Arc::new(Notify::new()),
        };

        (RecordSender { tx: record_tx }, host, metric_rx)
    }
}

/// Host that reads records from and writes metrics to tokio channels
pub struct ChannelHost {
    name: String,
    options: PluginOptions,
    rx: mpsc::Receiver<Record>,
    tx: mpsc::Sender<Metric>,
    shutdown: Arc<Notify>,
}

impl ChannelHost {
    /// Shorthand for [`ChannelHostBuilder::new`]
    pub fn builder(name: impl Into<String>) -> ChannelHostBuilder {
        ChannelHostBuilder::new(name)
    }

    /// Handle that ends the inbound stream while senders are still alive
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            notify: Arc::clone(&self.shutdown),
        }
    }
}

/// Closes a [`ChannelHost`]'s inbound channel from outside the loop
///
/// Queued records are still delivered; after that `recv` returns `None`
/// and further sends fail.
#[derive(Clone)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    /// Stop accepting records
    pub fn shutdown(&self) {
        self.notify.notify_one();
    }
}

#[async_trait]
impl Host for ChannelHost {
    fn name(&self) -> &str {
        &self.name
    }

    fn cfg_string_or(&self, key: &str, default: &str) -> String {
        self.options.string_or(key, default)
    }

    fn cfg_bool_or(&self, key: &str, default: bool) -> bool {
        self.options.bool_or(key, default)
    }

    fn log(&self, level: LogLevel, message: &str) {
        let plugin = self.name.as_str();
        match level {
            LogLevel::Trace => trace!(plugin, "{message}"),
            LogLevel::Debug => debug!(plugin, "{message}"),
            LogLevel::Notice => info!(plugin, "{message}"),
            LogLevel::Warn => warn!(plugin, "{message}"),
            LogLevel::Error => error!(plugin, "{message}"),
        }
    }

    async fn recv(&mut self) -> Option<Record> {
        let received = tokio::select! {
            biased;
            _ = self.shutdown.notified() => None,
            record = self.rx.recv() => Some(record),
        };
        match received {
            Some(record) => record,
            None => {
                self.rx.close();
                self.rx.recv().await
            }
        }
    }

    async fn send(&self, metric: Metric) -> Result<(), PluginError> {
        self.tx
            .send(metric)
            .await
            .map_err(|e| PluginError::Send(e.to_string()))
    }
}

/// Sender for injecting records into a [`ChannelHost`]
#[derive(Clone)]
pub struct RecordSender {
    tx: mpsc::Sender<Record>,
}

impl RecordSender {
    /// Send a record, waiting for channel space
    pub async fn send(&self, record: impl Into<Record>) -> Result<(), PluginError> {
        self.tx
            .send(record.into())
            .await
            .map_err(|e| PluginError::Send(e.to_string()))
    }

    /// Send a record from a thread outside the async runtime
    ///
    /// Blocks while the channel is full. Must not be called from async code.
    pub fn blocking_send(&self, record: impl Into<Record>) -> Result<(), PluginError> {
        self.tx
            .blocking_send(record.into())
            .map_err(|e| PluginError::Send(e.to_string()))
    }

    /// Try to send a record without blocking
    pub fn try_send(&self, record: impl Into<Record>) -> Result<(), PluginError> {
        self.tx
            .try_send(record.into())
            .map_err(|e| PluginError::Send(e.to_string()))
    }

    /// Check whether the host side is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use qmetric_core::{Dimensions, Message};

    fn metric() -> Metric {
        let time = chrono::DateTime::from_timestamp(0, 0).unwrap();
        Metric::gauge("metric", "cpu", 1.0, Dimensions::new(), time)
    }

    #[test]
    fn test_options_served() {
        let (_tx, host, _rx) = ChannelHost::builder("metric")
            .option("limit-dimensions", "a,b")
            .option("ignore-container-events", "false")
            .build();

        assert_eq!(host.name(), "metric");
        assert_eq!(host.cfg_string_or("limit-dimensions", ""), "a,b");
        assert_eq!(host.cfg_string_or("missing", "x"), "x");
        assert!(!host.cfg_bool_or("ignore-container-events", true));
    }

    #[tokio::test]
    async fn test_records_fan_in() {
        let (tx, mut host, _rx) = ChannelHost::builder("metric").build();
        let other = tx.clone();

        tx.send(Message::new("a")).await.unwrap();
        other.send(Record::other("event")).await.unwrap();
        drop(tx);
        drop(other);

        assert_eq!(host.recv().await.unwrap().kind(), "message");
        assert_eq!(host.recv().await.unwrap().kind(), "event");
        assert!(host.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_send_reaches_receiver() {
        let (_tx, host, mut rx) = ChannelHost::builder("metric").build();

        host.send(metric()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().name, "cpu");
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (_tx, host, rx) = ChannelHost::builder("metric").build();
        drop(rx);

        let result = host.send(metric()).await;
        assert!(matches!(result, Err(PluginError::Send(_))));
    }

    #[test]
    fn test_try_send_full_channel() {
        let (tx, _host, _rx) = ChannelHost::builder("metric").channel_capacity(1).build();

        tx.try_send(Message::new("a")).unwrap();
        assert!(matches!(
            tx.try_send(Message::new("b")),
            Err(PluginError::Send(_))
        ));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let (tx, _host, _rx) = ChannelHost::builder("metric").channel_capacity(0).build();
        tx.try_send(Message::new("a")).unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_drains_queued_records() {
        let (tx, mut host, _rx) = ChannelHost::builder("metric").build();
        let handle = host.shutdown_handle();

        tx.send(Message::new("a")).await.unwrap();
        tx.send(Message::new("b")).await.unwrap();
        handle.shutdown();

        assert_eq!(host.recv().await.unwrap().kind(), "message");
        assert_eq!(host.recv().await.unwrap().kind(), "message");
        assert!(host.recv().await.is_none());
        assert!(tx.send(Message::new("c")).await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_wakes_idle_recv() {
        let (_tx, mut host, _rx) = ChannelHost::builder("metric").build();
        let handle = host.shutdown_handle();

        let waiter = tokio::spawn(async move { host.recv().await });
        handle.shutdown();

        let received = tokio::time::timeout(std::time::Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(received.is_none());
    }

    #[tokio::test]
    async fn test_blocking_send_from_thread() {
        let (tx, mut host, _rx) = ChannelHost::builder("metric").build();

        std::thread::spawn(move || tx.blocking_send(Message::new("a")))
            .join()
            .unwrap()
            .unwrap();

        assert_eq!(host.recv().await.unwrap().kind(), "message");
        assert!(host.recv().await.is_none());
    }

    #[test]
    fn test_sender_sees_closed_host() {
        let (tx, host, _rx) = ChannelHost::builder("metric").build();
        assert!(!tx.is_closed());
        drop(host);
        assert!(tx.is_closed());
    }
}
