//! Presentation layer for biorun
//!
//! This crate contains CLI definitions, console diagnostics and
//! step-result formatting.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, OverrideArgs};
pub use output::console::ConsoleFormatter;
pub use output::diagnostics::ConsoleDiagnostics;
pub use output::report::{StepOutput, StepReport};
