//! Complete command lines ready for process invocation

use crate::core::error::DomainError;
use std::fmt;

/// `[program, (subcommand)?, arguments...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    subcommand: Option<String>,
    arguments: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Result<Self, DomainError> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(DomainError::InvalidProgram(program));
        }
        Ok(Self {
            program,
            subcommand: None,
            arguments: Vec::new(),
        })
    }

    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = String>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Everything passed to the program after its own name
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.subcommand
            .as_deref()
            .into_iter()
            .chain(self.arguments.iter().map(String::as_str))
    }

    /// Full token sequence, program first
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(self.program.as_str())
            .chain(self.args())
            .map(str::to_string)
            .collect()
    }

    /// `program subcommand`, used as the default execution tag
    pub fn display_name(&self) -> String {
        match &self.subcommand {
            Some(sub) => format!("{} {}", self.program, sub),
            None => self.program.clone(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(" "))
    }
}
