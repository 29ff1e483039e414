//! Shared adapters handed to every tool facade

use super::error::ToolError;
use crate::ports::dependency_checker::DependencyChecker;
use crate::ports::diagnostics::DiagnosticSink;
use crate::ports::filesystem::FileSystem;
use crate::use_cases::execute_command::CommandExecutor;
use std::sync::Arc;

/// Executor plus the filesystem and dependency ports a facade needs.
///
/// Cheap to clone; every facade holds its own copy.
#[derive(Clone)]
pub struct ToolEnv {
    executor: CommandExecutor,
    fs: Arc<dyn FileSystem>,
    dependencies: Arc<dyn DependencyChecker>,
}

impl ToolEnv {
    pub fn new(
        executor: CommandExecutor,
        fs: Arc<dyn FileSystem>,
        dependencies: Arc<dyn DependencyChecker>,
    ) -> Self {
        Self {
            executor,
            fs,
            dependencies,
        }
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn diagnostics(&self) -> &dyn DiagnosticSink {
        self.executor.diagnostics().as_ref()
    }

    /// Fail with the first program in `programs` that is not installed
    pub fn require(&self, programs: &[&str]) -> Result<(), ToolError> {
        match self.dependencies.missing(programs).first() {
            Some(program) => Err(ToolError::missing_dependency(*program)),
            None => Ok(()),
        }
    }
}
