//! Execution value objects: console mode, per-call options, process outcome

pub mod options;
pub mod result;

pub use options::{DEFAULT_TAG, ExecutionOptions, OutputMode};
pub use result::ExecutionResult;
