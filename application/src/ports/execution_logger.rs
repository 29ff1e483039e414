//! Port for structured execution logging.
//!
//! Defines the [`ExecutionLogger`] trait for recording every external command
//! run (tag, tokens, start time, duration, exit status) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable execution history (JSONL) for benchmarking and reports.

use biorun_domain::{CommandLine, ExecutionResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One completed (or failed to launch) command execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionEvent {
    /// Caller-supplied identifier (e.g. a run accession), `"NA"` by default
    pub tag: String,
    /// Full token sequence, program first
    pub command: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_error: Option<String>,
}

impl ExecutionEvent {
    pub fn new(
        tag: impl Into<String>,
        command: &CommandLine,
        started_at: DateTime<Utc>,
        result: &ExecutionResult,
    ) -> Self {
        Self {
            tag: tag.into(),
            command: command.tokens(),
            started_at,
            duration_ms: result.duration_ms(),
            exit_code: result.exit_code,
            success: result.is_success(),
            launch_error: result.launch_error.clone(),
        }
    }
}

/// Port for logging execution events to a structured log.
///
/// The `record` method is synchronous and non-fallible: a broken or missing
/// sink must never abort command execution, so failures are swallowed by
/// the implementation.
pub trait ExecutionLogger: Send + Sync {
    fn record(&self, event: &ExecutionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoExecutionLogger;

impl ExecutionLogger for NoExecutionLogger {
    fn record(&self, _event: &ExecutionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_event_from_result() {
        let command = CommandLine::new("samtools")
            .unwrap()
            .with_subcommand("index")
            .with_arguments(vec!["a.bam".to_string()]);
        let result = ExecutionResult::completed(Some(0), Duration::from_millis(1500));

        let event = ExecutionEvent::new("SRR1", &command, Utc::now(), &result);

        assert_eq!(event.command, vec!["samtools", "index", "a.bam"]);
        assert_eq!(event.duration_ms, 1500);
        assert!(event.success);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["tag"], "SRR1");
        assert!(json.get("launch_error").is_none());
    }
}
