//! `std::process` backed [`ProcessRunner`]

use biorun_application::ports::process_runner::ProcessRunner;
use biorun_domain::{CommandLine, ExecutionResult, OutputMode};
#[cfg(target_os = "linux")]
use std::os::unix::process::CommandExt;
use std::io;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::trace;

/// Runs commands as child processes of the current process.
///
/// The child inherits stdin. Stdout/stderr follow the [`OutputMode`]:
/// discarded, streamed to our stderr, or captured into the
/// [`ExecutionResult`]. Streamed output never reaches our stdout, which
/// carries only reports.
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    fn build(command: &CommandLine, mode: OutputMode) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args());

        match mode {
            OutputMode::Quiet => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
            OutputMode::Verbose => {
                cmd.stdout(Stdio::from(io::stderr())).stderr(Stdio::inherit());
            }
            OutputMode::Buffered => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        // Linux: request kernel to send SIGTERM to child when parent dies,
        // so an interrupted pipeline does not leave tools running.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandLine, mode: OutputMode) -> ExecutionResult {
        let mut cmd = Self::build(command, mode);
        let start = Instant::now();

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionResult::launch_failure(format!(
                    "Failed to start {}: {}",
                    command.program(),
                    e
                ));
            }
        };

        let output = match child.wait_with_output() {
            Ok(output) => output,
            Err(e) => {
                return ExecutionResult::completed(None, start.elapsed())
                    .with_output(String::new(), format!("Failed to wait for process: {}", e));
            }
        };

        let duration = start.elapsed();
        trace!(
            "{} exited with {:?} after {}ms",
            command.program(),
            output.status.code(),
            duration.as_millis()
        );

        ExecutionResult::completed(output.status.code(), duration).with_output(
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        )
    }
}
