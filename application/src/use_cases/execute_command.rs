//! Execute Command use case.
//!
//! Runs one [`CommandLine`] through the [`ProcessRunner`] port and turns the
//! outcome into a pass/fail answer, with optional execution logging.
//!
//! ```text
//! CommandLine ─▶ debug!("Executing: ...") ─▶ ProcessRunner::run(mode)
//!                                                  │
//!                          ┌───────────────────────┤
//!                          ▼                       ▼
//!           ExecutionLogger::record      DiagnosticSink::report
//!              (when log = true)            (on failure only)
//! ```

use crate::ports::diagnostics::{Diagnostic, DiagnosticSink, TracingDiagnostics};
use crate::ports::execution_logger::{ExecutionEvent, ExecutionLogger, NoExecutionLogger};
use crate::ports::process_runner::ProcessRunner;
use biorun_domain::{CommandLine, ExecutionOptions, ExecutionResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Executes command lines and reports their outcome.
///
/// Blocking: each call launches one process and waits for it to exit.
pub struct CommandExecutor {
    runner: Arc<dyn ProcessRunner>,
    logger: Arc<dyn ExecutionLogger>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Clone for CommandExecutor {
    fn clone(&self) -> Self {
        Self {
            runner: self.runner.clone(),
            logger: self.logger.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl CommandExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            logger: Arc::new(NoExecutionLogger),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Create with an execution logger.
    pub fn with_logger(mut self, logger: Arc<dyn ExecutionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Create with a diagnostic sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn diagnostics(&self) -> &Arc<dyn DiagnosticSink> {
        &self.diagnostics
    }

    /// Run `command`; `true` only when it exited with code 0.
    pub fn execute(&self, command: &CommandLine, options: &ExecutionOptions) -> bool {
        self.execute_detailed(command, options).is_success()
    }

    /// Run `command` and return the full result.
    pub fn execute_detailed(
        &self,
        command: &CommandLine,
        options: &ExecutionOptions,
    ) -> ExecutionResult {
        let mode = options.output_mode();
        debug!("Executing: {}", command);

        let started_at = Utc::now();
        let result = self.runner.run(command, mode);

        if options.log {
            self.logger
                .record(&ExecutionEvent::new(&options.tag, command, started_at, &result));
        }

        if !result.is_success() {
            let output = match &result.launch_error {
                Some(reason) => Some(reason.clone()),
                None if mode.captures_output() => Some(result.combined_output()),
                None => None,
            };
            self.diagnostics.report(Diagnostic::CommandFailed {
                command: command.display_name(),
                exit_code: result.exit_code,
                output,
            });
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingDiagnostics, RecordingLogger, ScriptedRunner};
    use biorun_domain::OutputMode;

    fn command() -> CommandLine {
        CommandLine::new("samtools")
            .unwrap()
            .with_subcommand("sort")
            .with_arguments(vec!["-o".to_string(), "out.bam".to_string()])
    }

    #[test]
    fn test_execute_success_only_for_zero() {
        let runner = Arc::new(ScriptedRunner::with_exit_codes([0, 1]));
        let executor = CommandExecutor::new(runner.clone())
            .with_diagnostics(Arc::new(RecordingDiagnostics::default()));

        assert!(executor.execute(&command(), &ExecutionOptions::new()));
        assert!(!executor.execute(&command(), &ExecutionOptions::new()));
        assert_eq!(runner.commands().len(), 2);
    }

    #[test]
    fn test_output_mode_forwarded() {
        let runner = Arc::new(ScriptedRunner::new());
        let executor = CommandExecutor::new(runner.clone());

        executor.execute(&command(), &ExecutionOptions::new().verbose(true));
        executor.execute(&command(), &ExecutionOptions::new().verbose(true).quiet(true));
        executor.execute(&command(), &ExecutionOptions::new());

        assert_eq!(
            runner.modes(),
            vec![OutputMode::Verbose, OutputMode::Quiet, OutputMode::Buffered]
        );
    }

    #[test]
    fn test_logs_event_when_enabled() {
        let runner = Arc::new(ScriptedRunner::new());
        let logger = Arc::new(RecordingLogger::default());
        let executor = CommandExecutor::new(runner).with_logger(logger.clone());

        executor.execute(&command(), &ExecutionOptions::new().with_tag("SRR1"));
        executor.execute(&command(), &ExecutionOptions::new().log(false));

        let events = logger.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tag, "SRR1");
        assert_eq!(events[0].command[0], "samtools");
        assert!(events[0].success);
    }

    #[test]
    fn test_failure_reports_captured_output_in_buffered_mode() {
        let runner = Arc::new(
            ScriptedRunner::with_exit_codes([2]).with_captured_output("", "bad header"),
        );
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let executor = CommandExecutor::new(runner).with_diagnostics(diagnostics.clone());

        assert!(!executor.execute(&command(), &ExecutionOptions::new()));

        let reports = diagnostics.reports();
        assert_eq!(reports.len(), 1);
        match &reports[0] {
            Diagnostic::CommandFailed {
                command,
                exit_code,
                output,
            } => {
                assert_eq!(command, "samtools sort");
                assert_eq!(*exit_code, Some(2));
                assert_eq!(output.as_deref(), Some("bad header"));
            }
            other => panic!("unexpected diagnostic: {:?}", other),
        }
    }

    #[test]
    fn test_failure_without_capture_has_no_output() {
        let runner = Arc::new(ScriptedRunner::with_exit_codes([1]));
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let executor = CommandExecutor::new(runner).with_diagnostics(diagnostics.clone());

        executor.execute(&command(), &ExecutionOptions::new().quiet(true));

        assert!(matches!(
            &diagnostics.reports()[0],
            Diagnostic::CommandFailed { output: None, .. }
        ));
    }

    #[test]
    fn test_launch_failure_is_false_and_logged() {
        let runner = Arc::new(ScriptedRunner::launch_failing("No such file or directory"));
        let logger = Arc::new(RecordingLogger::default());
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let executor = CommandExecutor::new(runner)
            .with_logger(logger.clone())
            .with_diagnostics(diagnostics.clone());

        assert!(!executor.execute(&command(), &ExecutionOptions::new()));

        let events = logger.events();
        assert_eq!(events[0].exit_code, None);
        assert_eq!(
            events[0].launch_error.as_deref(),
            Some("No such file or directory")
        );
        assert_eq!(diagnostics.reports().len(), 1);
    }
}
