//! Domain layer for biorun
//!
//! This crate contains the argument model and command-construction logic
//! used to invoke external bioinformatics tools. It has no dependencies on
//! process execution, the filesystem, or presentation concerns.
//!
//! # Core Concepts
//!
//! - **ArgumentMap**: one layer of options (persisted defaults or per-call
//!   overrides); `"--"` holds positional arguments
//! - **Whitelist**: option names a given tool recognizes
//! - **Merge & serialize**: overrides win key by key; unknown options are
//!   dropped and reported, never passed to the tool
//! - **StepFailure**: explicit failure values for tool operations

pub mod command;
pub mod core;
pub mod execution;
pub mod tool;

// Re-export commonly used types
pub use command::{
    ArgumentMap, CommandLine, IgnoredOption, OptionValue, POSITIONAL_KEY, SerializedArguments,
    Whitelist, merge_and_serialize, serialize,
};
pub use core::error::DomainError;
pub use execution::{DEFAULT_TAG, ExecutionOptions, ExecutionResult, OutputMode};
pub use tool::{ReadLayout, ReadSet, StepFailure, StepResult, ToolCategory, naming};
