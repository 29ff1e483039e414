//! Tool invocation facade
//!
//! Shared machinery behind every concrete tool: program name, whitelist,
//! persisted defaults, command construction and output verification.
//!
//! # Semantic operation lifecycle
//!
//! ```text
//! not started ──▶ invoke ──┬──▶ succeeded (output verified)
//!                          └──▶ failed (non-zero exit | launch failure | missing output)
//! ```
//!
//! Concrete tools compute an output path, inject it into the per-call
//! overrides, call [`ToolFacade::run_step`] and finish with
//! [`ToolFacade::verify_output`].

use super::env::ToolEnv;
use super::error::ToolError;
use crate::ports::diagnostics::Diagnostic;
use biorun_domain::{
    ArgumentMap, CommandLine, DomainError, ExecutionOptions, OptionValue, StepFailure, StepResult,
    ToolCategory, Whitelist, merge_and_serialize,
};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ToolFacade {
    program: String,
    category: ToolCategory,
    whitelist: Whitelist,
    defaults: ArgumentMap,
    env: ToolEnv,
}

impl ToolFacade {
    /// Build a facade for `program`, failing if it is not installed or if
    /// `defaults` is structurally invalid.
    pub fn new(
        env: ToolEnv,
        program: impl Into<String>,
        category: ToolCategory,
        whitelist: Whitelist,
        defaults: ArgumentMap,
    ) -> Result<Self, ToolError> {
        let program = program.into();
        env.require(&[program.as_str()])?;
        defaults.validate()?;

        Ok(Self {
            program,
            category,
            whitelist,
            defaults,
            env,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn category(&self) -> ToolCategory {
        self.category
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    pub fn defaults(&self) -> &ArgumentMap {
        &self.defaults
    }

    pub fn env(&self) -> &ToolEnv {
        &self.env
    }

    /// Persisted single value under `flag`, e.g. the configured index
    pub fn resource(&self, flag: &str) -> Option<&str> {
        self.defaults.get(flag).and_then(OptionValue::as_value)
    }

    /// Replace a persisted default, e.g. after building an index
    pub fn set_resource(&mut self, flag: &str, value: impl Into<OptionValue>) {
        let value = value.into();
        info!("{} {} set to {}", self.program, flag, value);
        self.defaults.insert(flag, value);
    }

    /// Merge `overrides` over the persisted defaults and build the command
    /// line. Options outside the whitelist are reported and dropped.
    pub fn build_command(
        &self,
        subcommand: Option<&str>,
        overrides: &ArgumentMap,
    ) -> Result<CommandLine, DomainError> {
        self.command_for(&self.program, subcommand, &self.whitelist, &self.defaults, overrides)
    }

    fn command_for(
        &self,
        program: &str,
        subcommand: Option<&str>,
        whitelist: &Whitelist,
        base: &ArgumentMap,
        overrides: &ArgumentMap,
    ) -> Result<CommandLine, DomainError> {
        let serialized = merge_and_serialize(whitelist, base, overrides)?;
        for option in serialized.ignored {
            self.env.diagnostics().report(Diagnostic::IgnoredOption {
                program: program.to_string(),
                option,
            });
        }

        let mut command = CommandLine::new(program)?;
        if let Some(subcommand) = subcommand {
            command = command.with_subcommand(subcommand);
        }
        Ok(command.with_arguments(serialized.tokens))
    }

    /// Run the tool with `overrides` merged over the defaults.
    ///
    /// `Ok(false)` is an execution failure; `Err` means the arguments were
    /// structurally invalid and nothing was run.
    pub fn run_raw(
        &self,
        subcommand: Option<&str>,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> Result<bool, DomainError> {
        let command = self.build_command(subcommand, overrides)?;
        Ok(self.env.executor().execute(&command, options))
    }

    /// [`run_raw`](Self::run_raw) as a step: a failed execution becomes
    /// [`StepFailure::ExecutionFailed`] carrying the exit code.
    pub fn run_step(
        &self,
        subcommand: Option<&str>,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<()> {
        let command = self.build_command(subcommand, overrides)?;
        self.execute_step(&command, options)
    }

    /// Run a sibling program (e.g. `cuffmerge`) with this tool's whitelist
    /// and defaults.
    pub fn run_as(
        &self,
        program: &str,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<()> {
        let command = self.command_for(program, None, &self.whitelist, &self.defaults, overrides)?;
        self.execute_step(&command, options)
    }

    /// Run a companion program (e.g. an index builder) that has its own
    /// whitelist and shares none of this tool's defaults.
    pub fn run_companion(
        &self,
        program: &str,
        subcommand: Option<&str>,
        whitelist: &Whitelist,
        arguments: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<()> {
        let command = self.command_for(
            program,
            subcommand,
            whitelist,
            &ArgumentMap::new(),
            arguments,
        )?;
        self.execute_step(&command, options)
    }

    fn execute_step(&self, command: &CommandLine, options: &ExecutionOptions) -> StepResult<()> {
        let result = self.env.executor().execute_detailed(command, options);
        if result.is_success() {
            Ok(())
        } else {
            Err(StepFailure::execution_failed(
                command.display_name(),
                result.exit_code,
            ))
        }
    }

    /// `path` if it exists, otherwise [`StepFailure::MissingOutput`]
    pub fn verify_output(&self, path: impl Into<PathBuf>) -> StepResult<PathBuf> {
        let path = path.into();
        if self.env.fs().path_exists(&path) {
            Ok(path)
        } else {
            Err(StepFailure::missing_output(path))
        }
    }

    /// Create `dir` (and parents) when missing
    pub fn prepare_out_dir(&self, dir: &Path) -> StepResult<()> {
        if self.env.fs().path_exists(dir) {
            return Ok(());
        }
        self.env
            .fs()
            .make_dir(dir)
            .map_err(|e| StepFailure::Filesystem {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Construction-time variant of [`prepare_out_dir`](Self::prepare_out_dir)
    /// for directories a tool is configured with.
    pub fn ensure_resource_dir(&self, dir: &Path) -> Result<(), ToolError> {
        if self.env.fs().path_exists(dir) {
            return Ok(());
        }
        self.env
            .fs()
            .make_dir(dir)
            .map_err(|source| ToolError::ResourceDirectory {
                path: dir.to_path_buf(),
                source,
            })
    }

    /// Every path in `files` must be an existing regular file
    pub fn require_files<P: AsRef<Path>>(&self, files: &[P]) -> StepResult<()> {
        let missing: Vec<String> = files
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| !self.env.fs().is_file(p))
            .map(|p| p.display().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StepFailure::invalid_input(format!(
                "File not found: {}",
                missing.join(", ")
            )))
        }
    }

    /// Whether an existing output at `path` should be returned as-is
    /// instead of running the tool again.
    pub fn keep_existing(&self, path: &Path, overwrite: bool) -> bool {
        if overwrite || !self.env.fs().is_file(path) {
            return false;
        }
        self.env.diagnostics().report(Diagnostic::Notice(format!(
            "{} already exists, skipping {}",
            path.display(),
            self.program
        )));
        true
    }

    /// Best-effort removal of intermediate files; failures are reported
    /// but do not fail the step.
    pub fn remove_files<P: AsRef<Path>>(&self, files: &[P]) {
        for file in files.iter().map(AsRef::as_ref) {
            if let Err(e) = self.env.fs().remove_file(file) {
                self.env.diagnostics().report(Diagnostic::Notice(format!(
                    "Error deleting {}: {}",
                    file.display(),
                    e
                )));
            }
        }
    }

    /// Report a failed step under `<program> <operation>` and pass the
    /// result through. Execution failures were already reported by the
    /// executor and are passed through silently.
    pub fn finish<T>(&self, operation: &str, result: StepResult<T>) -> StepResult<T> {
        if let Err(failure) = &result
            && !matches!(failure, StepFailure::ExecutionFailed { .. })
        {
            self.env.diagnostics().report(Diagnostic::StepFailed {
                operation: format!("{} {}", self.program, operation),
                failure: failure.clone(),
            });
        }
        result
    }
}
