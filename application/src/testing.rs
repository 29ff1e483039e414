//! In-memory port implementations shared by the crate's tests

use crate::ports::dependency_checker::DependencyChecker;
use crate::ports::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ports::execution_logger::{ExecutionEvent, ExecutionLogger};
use crate::ports::filesystem::FileSystem;
use crate::ports::process_runner::ProcessRunner;
use crate::tools::env::ToolEnv;
use crate::use_cases::execute_command::CommandExecutor;
use biorun_domain::{CommandLine, ExecutionResult, OutputMode};
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every command and answers with scripted exit codes.
///
/// Exit codes are consumed in order; once exhausted every run succeeds.
/// Files registered with [`ScriptedRunner::creating`] are touched after each
/// successful run, standing in for the tool's output.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<(CommandLine, OutputMode)>>,
    exit_codes: Mutex<VecDeque<i32>>,
    creates: Vec<PathBuf>,
    stdout: String,
    stderr: String,
    launch_error: Option<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            exit_codes: Mutex::new(codes.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn launch_failing(reason: &str) -> Self {
        Self {
            launch_error: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn creating(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.creates.extend(paths);
        self
    }

    pub fn with_captured_output(mut self, stdout: &str, stderr: &str) -> Self {
        self.stdout = stdout.to_string();
        self.stderr = stderr.to_string();
        self
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn modes(&self) -> Vec<OutputMode> {
        self.calls.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }

    /// Tokens of the n-th command, program first
    pub fn tokens(&self, index: usize) -> Vec<String> {
        self.commands()[index].tokens()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine, mode: OutputMode) -> ExecutionResult {
        self.calls.lock().unwrap().push((command.clone(), mode));

        if let Some(reason) = &self.launch_error {
            return ExecutionResult::launch_failure(reason.clone());
        }

        let code = self.exit_codes.lock().unwrap().pop_front().unwrap_or(0);
        if code == 0 {
            for path in &self.creates {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(path, b"").unwrap();
            }
        }

        let result = ExecutionResult::completed(Some(code), Duration::from_millis(5));
        if mode.captures_output() {
            result.with_output(self.stdout.clone(), self.stderr.clone())
        } else {
            result
        }
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<ExecutionEvent>>,
}

impl RecordingLogger {
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ExecutionLogger for RecordingLogger {
    fn record(&self, event: &ExecutionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports.lock().unwrap().clone()
    }

    pub fn ignored_keys(&self) -> Vec<String> {
        self.reports()
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::IgnoredOption { option, .. } => Some(option.key),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.reports.lock().unwrap().push(diagnostic);
    }
}

/// Every program is installed except the listed ones.
#[derive(Default)]
pub struct FakeDependencies {
    missing: Vec<String>,
}

impl FakeDependencies {
    pub fn missing(programs: &[&str]) -> Self {
        Self {
            missing: programs.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl DependencyChecker for FakeDependencies {
    fn is_available(&self, program: &str) -> bool {
        !self.missing.iter().any(|m| m == program)
    }
}

/// `std::fs` backed filesystem for tests under a tempdir.
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn make_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

/// Test harness wiring a [`ScriptedRunner`] into a [`ToolEnv`].
pub struct Harness {
    pub env: ToolEnv,
    pub runner: Arc<ScriptedRunner>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

impl Harness {
    pub fn new(runner: ScriptedRunner) -> Self {
        Self::with_dependencies(runner, FakeDependencies::default())
    }

    pub fn with_dependencies(runner: ScriptedRunner, dependencies: FakeDependencies) -> Self {
        let runner = Arc::new(runner);
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let executor = CommandExecutor::new(runner.clone()).with_diagnostics(diagnostics.clone());
        let env = ToolEnv::new(executor, Arc::new(StdFileSystem), Arc::new(dependencies));
        Self {
            env,
            runner,
            diagnostics,
        }
    }
}
