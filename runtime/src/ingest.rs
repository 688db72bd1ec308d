//! NDJSON record ingest
//!
//! One JSON object per line. The `kind` field picks the record shape:
//!
//! ```json
//! {"kind": "message", "source_path": ["collector"], "tags": {"name": "cpu", "time": "1000000000", "value": "0.42"}}
//! {"kind": "container", "source_path": ["collector"], "tags": {...}, "container": {"Id": "c1", ...}, "engine": {"Name": "swarm1", ...}}
//! ```
//!
//! Any other `kind` (or none) becomes [`Record::Other`]. Blank lines are
//! skipped; lines that are not JSON objects are logged and skipped.
//!
//! [`forward_lines`] blocks on both the reader and the channel, so it runs
//! on a plain thread rather than a tokio task.

use qmetric_core::{ContainerMessage, Message, Record};
use qmetric_filter::RecordSender;
use serde_json::Value;
use std::io::BufRead;
use thiserror::Error;
use tracing::{debug, warn};

/// Record kind used when the `kind` field is missing
pub const UNKNOWN_KIND: &str = "unknown";

/// Why a line could not become a record
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse one NDJSON line
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_record(line: &str) -> Result<Option<Record>, IngestError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line)?;
    if !value.is_object() {
        return Err(IngestError::NotAnObject);
    }

    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_KIND)
        .to_string();

    let record = match kind.as_str() {
        "message" => Record::Message(serde_json::from_value::<Message>(value)?),
        "container" => Record::Container(serde_json::from_value::<ContainerMessage>(value)?),
        _ => Record::other(kind),
    };
    Ok(Some(record))
}

/// Forward every line of `reader` to the filter
///
/// Returns the number of records forwarded once the input ends or the
/// filter stops accepting records. Must not be called from async code.
pub fn forward_lines<R: BufRead>(reader: R, sender: RecordSender) -> Result<u64, IngestError> {
    let mut forwarded = 0u64;
    let mut line_no = 0u64;

    for line in reader.lines() {
        let line = line?;
        line_no += 1;
        let record = match parse_record(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping input line");
                continue;
            }
        };

        if let Err(e) = sender.blocking_send(record) {
            debug!(error = %e, "Filter stopped accepting records");
            break;
        }
        forwarded += 1;
    }

    debug!(forwarded, "Input finished");
    Ok(forwarded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use qmetric_core::Host;
    use qmetric_filter::ChannelHost;

    #[test]
    fn test_parse_message() {
        let line = r#"{"kind":"message","source_path":["collector"],"tags":{"name":"cpu","value":"1"}}"#;
        let Some(Record::Message(msg)) = parse_record(line).unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(msg.last_source(), "collector");
        assert_eq!(msg.tag("name"), Some("cpu"));
    }

    #[test]
    fn test_parse_container() {
        let line = r#"{
            "kind": "container",
            "source_path": ["collector", "docker-stats"],
            "tags": {"name": "cpu"},
            "container": {
                "Id": "c1", "Name": "/web1", "Image": "nginx", "Created": null,
                "Config": {"Cmd": ["nginx"], "Labels": {"com.docker.swarm.task.name": "web.0.abc"}}
            },
            "engine": {"Name": "swarm1", "Swarm": {"NodeAddr": "10.0.0.1"}}
        }"#
        .replace('\n', " ");

        let Some(Record::Container(msg)) = parse_record(&line).unwrap() else {
            panic!("expected a container message");
        };
        assert_eq!(msg.message.last_source(), "docker-stats");
        assert_eq!(msg.container.id, "c1");
        assert_eq!(msg.container.created, "");
        assert_eq!(msg.container.label("com.docker.swarm.task.name"), Some("web.0.abc"));
        assert_eq!(msg.engine.name, "swarm1");
        assert_eq!(msg.engine.swarm.node_addr, "10.0.0.1");
    }

    #[test]
    fn test_parse_other_kinds() {
        let record = parse_record(r#"{"kind":"container-event","action":"start"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(record, Record::other("container-event"));

        let record = parse_record(r#"{"tags":{}}"#).unwrap().unwrap();
        assert_eq!(record.kind(), UNKNOWN_KIND);
    }

    #[test]
    fn test_parse_rejects() {
        assert!(parse_record("   ").unwrap().is_none());
        assert!(matches!(parse_record("not json"), Err(IngestError::Json(_))));
        assert!(matches!(parse_record("[1,2]"), Err(IngestError::NotAnObject)));
        assert!(matches!(
            parse_record(r#"{"kind":"message","tags":"oops"}"#),
            Err(IngestError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_forward_lines_skips_bad_input() {
        let input = concat!(
            "{\"kind\":\"message\",\"source_path\":[\"a\"]}\n",
            "\n",
            "garbage\n",
            "{\"kind\":\"other\"}\n",
        );
        let (sender, mut host, _metrics) = ChannelHost::builder("metric").build();

        let forwarded = tokio::task::spawn_blocking(move || forward_lines(input.as_bytes(), sender))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(forwarded, 2);

        assert_eq!(host.recv().await.unwrap().kind(), "message");
        assert_eq!(host.recv().await.unwrap().kind(), "other");
        assert!(host.recv().await.is_none());
    }

    #[test]
    fn test_forward_lines_stops_when_filter_gone() {
        let (sender, host, _metrics) = ChannelHost::builder("metric").build();
        drop(host);

        let input = "{\"kind\":\"message\"}\n{\"kind\":\"message\"}\n";
        let forwarded = forward_lines(input.as_bytes(), sender).unwrap();
        assert_eq!(forwarded, 0);
    }

    #[tokio::test]
    async fn test_shutdown_unblocks_full_channel() {
        let (sender, mut host, _metrics) = ChannelHost::builder("metric").channel_capacity(1).build();
        let handle = host.shutdown_handle();

        let input = "{\"kind\":\"message\"}\n".repeat(3);
        let ingest = tokio::task::spawn_blocking(move || forward_lines(input.as_bytes(), sender));

        assert_eq!(host.recv().await.unwrap().kind(), "message");
        handle.shutdown();
        while host.recv().await.is_some() {}

        let forwarded = tokio::time::timeout(std::time::Duration::from_secs(5), ingest)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(forwarded < 3);
    }
}
