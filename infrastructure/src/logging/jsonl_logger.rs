//! JSONL file writer for request events.
//!
//! Each [`RequestEvent`] becomes one JSON line carrying its payload plus a
//! `type` and an RFC 3339 `timestamp`. The file is opened in append mode so
//! consecutive runs accumulate in one log.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thinktank_application::{RequestEvent, RequestEventLogger};
use tracing::warn;

/// Request event logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and on `Drop`.
pub struct JsonlEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: RequestEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert("timestamp".to_string(), serde_json::Value::String(timestamp));
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        }
    }
}

impl RequestEventLogger for JsonlEventLogger {
    fn log(&self, event: RequestEvent) {
        let event_type = event.event_type;
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(
                "Could not write {} event to {}: {}",
                event_type,
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for JsonlEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlEventLogger::open(&path).unwrap();

        logger.log(RequestEvent::new(
            "thoughts_generated",
            serde_json::json!({"project_id": "demo", "agents": 3, "thoughts": 12}),
        ));
        logger.log(RequestEvent::new(
            "consensus",
            serde_json::json!({"reached": true, "conflicts": 0}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for value in &lines {
            assert!(value.get("type").is_some());
            let timestamp = value["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        }
        assert_eq!(lines[0]["type"], "thoughts_generated");
        assert_eq!(lines[0]["thoughts"], 12);
        assert_eq!(lines[1]["reached"], true);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlEventLogger::open(&path).unwrap();

        logger.log(RequestEvent::new("note", serde_json::json!("just a string")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.jsonl");

        for run in 0..2 {
            let logger = JsonlEventLogger::open(&path).unwrap();
            logger.log(RequestEvent::new(
                "request_completed",
                serde_json::json!({"run": run}),
            ));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["run"], 1);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        assert!(JsonlEventLogger::open(blocker.join("events.jsonl")).is_err());
    }
}
