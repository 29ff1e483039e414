//! JSONL file writer for execution events.
//!
//! Each [`ExecutionEvent`] is serialized as a single JSON line with
//! `type = "command"` and a millisecond-precision `started_at`, appended to
//! the file via a buffered writer.

use biorun_application::ports::execution_logger::{ExecutionEvent, ExecutionLogger};
use chrono::SecondsFormat;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// File name used inside a configured log directory
pub const EXECUTION_LOG_FILE: &str = "executions.jsonl";

/// JSONL execution logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Appends to an existing file so
/// consecutive runs share one history. Flushes on `Drop`.
pub struct JsonlExecutionLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlExecutionLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` with a warning if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create execution log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open execution log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Logger writing [`EXECUTION_LOG_FILE`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Option<Self> {
        Self::new(dir.as_ref().join(EXECUTION_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_record(event: &ExecutionEvent) -> Option<serde_json::Value> {
        let serde_json::Value::Object(mut map) = serde_json::to_value(event).ok()? else {
            return None;
        };
        map.insert("type".to_string(), "command".into());
        map.insert(
            "started_at".to_string(),
            event
                .started_at
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
        );
        Some(serde_json::Value::Object(map))
    }
}

impl ExecutionLogger for JsonlExecutionLogger {
    fn record(&self, event: &ExecutionEvent) {
        let Some(record) = Self::to_record(event) else {
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlExecutionLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biorun_domain::{CommandLine, ExecutionResult};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn event(tag: &str, result: &ExecutionResult) -> ExecutionEvent {
        let command = CommandLine::new("samtools")
            .unwrap()
            .with_subcommand("sort")
            .with_arguments(["-o".to_string(), "out.bam".to_string(), "in.bam".to_string()]);
        let started_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        ExecutionEvent::new(tag, &command, started_at, result)
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_command_records() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlExecutionLogger::in_dir(dir.path()).unwrap();
        let path = logger.path().to_path_buf();

        let ok = ExecutionResult::completed(Some(0), Duration::from_millis(1500));
        let failed = ExecutionResult::completed(Some(1), Duration::from_millis(20));
        logger.record(&event("SRR001", &ok));
        logger.record(&event("NA", &failed));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);

        let first = &lines[0];
        assert_eq!(first["type"], "command");
        assert_eq!(first["tag"], "SRR001");
        assert_eq!(first["started_at"], "2024-05-01T12:30:00.000Z");
        assert_eq!(first["duration_ms"], 1500);
        assert_eq!(first["exit_code"], 0);
        assert_eq!(first["success"], true);
        assert_eq!(
            first["command"],
            serde_json::json!(["samtools", "sort", "-o", "out.bam", "in.bam"])
        );

        assert_eq!(lines[1]["success"], false);
        assert_eq!(lines[1]["exit_code"], 1);
    }

    #[test]
    fn test_jsonl_logger_records_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("runs.jsonl");
        let logger = JsonlExecutionLogger::new(&path).unwrap();

        logger.record(&event("NA", &ExecutionResult::launch_failure("not found")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["launch_error"], "not found");
        assert!(lines[0].get("exit_code").is_none());
    }

    #[test]
    fn test_jsonl_logger_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let ok = ExecutionResult::completed(Some(0), Duration::ZERO);

        for _ in 0..2 {
            let logger = JsonlExecutionLogger::in_dir(dir.path()).unwrap();
            logger.record(&event("NA", &ok));
        }

        assert_eq!(read_lines(&dir.path().join(EXECUTION_LOG_FILE)).len(), 2);
    }

    #[test]
    fn test_jsonl_logger_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlExecutionLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
