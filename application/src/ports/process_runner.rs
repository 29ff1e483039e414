//! Process runner port
//!
//! Launches a [`CommandLine`] as a child process and waits for it.

use biorun_domain::{CommandLine, ExecutionResult, OutputMode};

/// Port for running external processes.
///
/// Implementations block until the child exits. There is no timeout: a hung
/// tool blocks the caller indefinitely.
///
/// Launch failures (program not found, permission denied) must be returned
/// as [`ExecutionResult::launch_failure`], never as a panic.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, command: &CommandLine, mode: OutputMode) -> ExecutionResult;
}
