//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are raised for arguments that are structurally invalid. Options that
/// are merely unknown to a tool are not errors; they are reported as
/// [`IgnoredOption`](crate::command::IgnoredOption) diagnostics instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid option name {0:?}: names must be non-empty and contain no whitespace")]
    InvalidOptionName(String),

    #[error("Positional argument at index {index} is empty")]
    EmptyPositionalValue { index: usize },

    #[error("Positional arguments must be values, not a bare flag")]
    FlagAsPositional,

    #[error("Invalid program name: {0:?}")]
    InvalidProgram(String),
}

impl DomainError {
    /// Check if this error was caused by the positional-argument entry
    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyPositionalValue { .. } | DomainError::FlagAsPositional
        )
    }
}
