//! Tool construction errors

use biorun_domain::DomainError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Setup problems detected while constructing a tool facade.
///
/// Per-invocation outcomes are [`StepFailure`](biorun_domain::StepFailure)
/// values instead; a `ToolError` means the facade could not be built at all.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{program} not found; install it or add it to PATH")]
    MissingDependency { program: String },

    #[error("Failed to create resource directory {}: {source}", .path.display())]
    ResourceDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid default arguments: {0}")]
    InvalidArguments(#[from] DomainError),
}

impl ToolError {
    pub fn missing_dependency(program: impl Into<String>) -> Self {
        ToolError::MissingDependency {
            program: program.into(),
        }
    }
}
