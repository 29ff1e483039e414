//! Per-call execution settings

use serde::{Deserialize, Serialize};

/// Default tag attached to execution records when the caller gives none
pub const DEFAULT_TAG: &str = "NA";

/// How a child process's stdout/stderr reach the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Discard everything
    Quiet,
    /// Stream live to the parent's stdout/stderr
    Verbose,
    /// Capture; shown only when the command fails
    Buffered,
}

impl OutputMode {
    /// Resolve the console mode from the two user-facing switches.
    ///
    /// `quiet` takes precedence over `verbose`.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Buffered
        }
    }

    pub fn captures_output(&self) -> bool {
        matches!(self, OutputMode::Buffered)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputMode::Quiet => "quiet",
            OutputMode::Verbose => "verbose",
            OutputMode::Buffered => "buffered",
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings for a single execution: console mode, telemetry and a tag
/// (for example a run accession) attached to the execution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOptions {
    pub verbose: bool,
    pub quiet: bool,
    /// Hand an execution record to the logging sink
    pub log: bool,
    pub tag: String,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            log: true,
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Copy of these options carrying `tag`, unless a tag was set explicitly
    pub fn tagged_or(&self, tag: &str) -> Self {
        if self.tag == DEFAULT_TAG {
            self.clone().with_tag(tag)
        } else {
            self.clone()
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.verbose, self.quiet)
    }
}
