//! Outcome of one external process execution

use std::time::Duration;

/// Result of running a command line.
///
/// `stdout`/`stderr` are only populated in
/// [`OutputMode::Buffered`](super::OutputMode::Buffered); streamed or
/// suppressed output is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    /// Exit code, `None` when the process never started or died by signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    /// Why the process could not be started (not found, permission denied)
    pub launch_error: Option<String>,
}

impl ExecutionResult {
    /// A process that ran to completion
    pub fn completed(exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            exit_code,
            duration,
            ..Default::default()
        }
    }

    /// A process that could not be launched
    pub fn launch_failure(reason: impl Into<String>) -> Self {
        Self {
            launch_error: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self.stderr = stderr.into();
        self
    }

    /// Success is exit code 0 and nothing else
    pub fn is_success(&self) -> bool {
        self.launch_error.is_none() && self.exit_code == Some(0)
    }

    pub fn was_launched(&self) -> bool {
        self.launch_error.is_none()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// Captured output, stdout first, with stderr separated by a marker
    pub fn combined_output(&self) -> String {
        let mut combined = String::new();
        if !self.stdout.is_empty() {
            combined.push_str(&self.stdout);
        }
        if !self.stderr.is_empty() {
            if !combined.is_empty() {
                combined.push_str("\n--- stderr ---\n");
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}
