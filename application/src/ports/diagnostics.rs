//! Diagnostic sink port
//!
//! Non-fatal events raised while building and running commands: options
//! dropped by a whitelist, failed executions and failed semantic steps.
//! The facade never prints directly; presentation decides how these look.

use biorun_domain::{IgnoredOption, StepFailure};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An option was not in the tool's whitelist and was not passed on
    IgnoredOption {
        program: String,
        option: IgnoredOption,
    },
    /// A command exited non-zero or could not be launched
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        /// Captured stdout/stderr, only in buffered mode
        output: Option<String>,
    },
    /// A semantic operation returned a failure value
    StepFailed {
        operation: String,
        failure: StepFailure,
    },
    Notice(String),
}

impl Diagnostic {
    pub fn is_warning(&self) -> bool {
        !matches!(self, Diagnostic::Notice(_))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IgnoredOption { program, option } => write!(f, "{}: {}", program, option),
            Diagnostic::CommandFailed {
                command,
                exit_code: Some(code),
                ..
            } => write!(f, "{} failed with exit code {}", command, code),
            Diagnostic::CommandFailed { command, .. } => write!(f, "{} failed to run", command),
            Diagnostic::StepFailed { operation, failure } => {
                write!(f, "{} failed: {}", operation, failure)
            }
            Diagnostic::Notice(message) => f.write_str(message),
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::CommandFailed {
                output: Some(output),
                ..
            } if !output.is_empty() => {
                warn!("{}\n{}", diagnostic, output);
            }
            Diagnostic::Notice(_) => info!("{}", diagnostic),
            _ => warn!("{}", diagnostic),
        }
    }
}

/// Discards everything.
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    fn report(&self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use biorun_domain::OptionValue;

    #[test]
    fn test_display() {
        let ignored = Diagnostic::IgnoredOption {
            program: "hisat2".into(),
            option: IgnoredOption {
                key: "--bogus".into(),
                value: OptionValue::value("1"),
            },
        };
        assert_eq!(
            ignored.to_string(),
            "hisat2: Unknown argument --bogus = 1. ignoring..."
        );

        let failed = Diagnostic::CommandFailed {
            command: "samtools sort".into(),
            exit_code: Some(1),
            output: None,
        };
        assert_eq!(failed.to_string(), "samtools sort failed with exit code 1");

        let not_launched = Diagnostic::CommandFailed {
            command: "nope".into(),
            exit_code: None,
            output: None,
        };
        assert_eq!(not_launched.to_string(), "nope failed to run");
    }

    #[test]
    fn test_notice_is_not_warning() {
        assert!(!Diagnostic::Notice("ok".into()).is_warning());
        assert!(
            Diagnostic::StepFailed {
                operation: "align".into(),
                failure: StepFailure::invalid_input("no reads"),
            }
            .is_warning()
        );
    }
}
