//! Stdout metric sink
//!
//! Drains the filter's outbound channel and writes each metric either as a
//! JSON line or as a boxed block for reading in a terminal.

use crate::config::SinkFormat;
use qmetric_core::Metric;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;

/// Sink failures
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("stdout write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("metric encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes metrics to stdout
pub struct StdoutSink {
    format: SinkFormat,
    written: AtomicU64,
}

impl StdoutSink {
    /// Create a sink writing in the given format
    pub fn new(format: SinkFormat) -> Self {
        Self {
            format,
            written: AtomicU64::new(0),
        }
    }

    /// Metrics written so far
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Write one metric to `out`
    pub fn write_metric<W: Write>(&self, out: &mut W, met: &Metric) -> Result<(), SinkError> {
        match self.format {
            SinkFormat::Json => {
                serde_json::to_writer(&mut *out, met)?;
                writeln!(out)?;
            }
            SinkFormat::Pretty => {
                writeln!(out, "┌─ Metric ────────────────────────────────────────────")?;
                writeln!(out, "│ Name:      {}", met.name)?;
                writeln!(out, "│ Value:     {}", met.value)?;
                writeln!(out, "│ Time:      {}", met.time.to_rfc3339())?;
                writeln!(out, "│ Plugin:    {}", met.plugin)?;
                let mut keys: Vec<_> = met.dimensions.keys().collect();
                keys.sort();
                for key in keys {
                    writeln!(out, "│ {key} = {}", met.dimensions[key])?;
                }
                writeln!(out, "└─────────────────────────────────────────────────────")?;
            }
        }
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Write everything from `rx` to stdout until the channel closes
    pub async fn drain(&self, mut rx: mpsc::Receiver<Metric>) -> Result<u64, SinkError> {
        while let Some(met) = rx.recv().await {
            let mut stdout = std::io::stdout().lock();
            self.write_metric(&mut stdout, &met)?;
            stdout.flush()?;
        }
        Ok(self.written())
    }
}
