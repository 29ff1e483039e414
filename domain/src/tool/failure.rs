//! Per-invocation failure values
//!
//! Every semantic tool operation returns [`StepResult`]. A failure is an
//! ordinary value the caller branches on, so a multi-step pipeline
//! (align → sort → assemble) can stop at the first failed step with `?`.
//!
//! | Code | Meaning |
//! |------|---------|
//! | `INVALID_INPUT` | inputs missing or unusable before anything ran |
//! | `INVALID_ARGUMENTS` | structurally invalid option names or values |
//! | `MISSING_INDEX` | tool needs an index that is not configured or not on disk |
//! | `EXECUTION_FAILED` | non-zero exit or the program could not be launched |
//! | `MISSING_OUTPUT` | the tool reported success but its output is absent |
//! | `FILESYSTEM` | an output directory or file operation failed |

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type StepResult<T> = Result<T, StepFailure>;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepFailure {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("No valid index for {program}; build one first")]
    MissingIndex { program: String },

    #[error("{}", execution_failed_message(.command, .exit_code))]
    ExecutionFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("Expected output not found: {}", .path.display())]
    MissingOutput { path: PathBuf },

    #[error("Filesystem error at {}: {reason}", .path.display())]
    Filesystem { path: PathBuf, reason: String },
}

fn execution_failed_message(command: &str, exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("{} failed with exit code {}", command, code),
        None => format!("{} failed to run", command),
    }
}

impl StepFailure {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        StepFailure::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn missing_output(path: impl Into<PathBuf>) -> Self {
        StepFailure::MissingOutput { path: path.into() }
    }

    pub fn execution_failed(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        StepFailure::ExecutionFailed {
            command: command.into(),
            exit_code,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StepFailure::InvalidInput { .. } => "INVALID_INPUT",
            StepFailure::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            StepFailure::MissingIndex { .. } => "MISSING_INDEX",
            StepFailure::ExecutionFailed { .. } => "EXECUTION_FAILED",
            StepFailure::MissingOutput { .. } => "MISSING_OUTPUT",
            StepFailure::Filesystem { .. } => "FILESYSTEM",
        }
    }

    /// Failures caused by the external process or its side effects, as
    /// opposed to problems detected before anything ran
    pub fn is_execution_related(&self) -> bool {
        matches!(
            self,
            StepFailure::ExecutionFailed { .. } | StepFailure::MissingOutput { .. }
        )
    }
}

impl From<DomainError> for StepFailure {
    fn from(error: DomainError) -> Self {
        StepFailure::InvalidArguments {
            reason: error.to_string(),
        }
    }
}
