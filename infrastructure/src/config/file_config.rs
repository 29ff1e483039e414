//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//!
//! ```toml
//! [execution]
//! verbose = false
//! quiet = false
//! log = true
//! log_dir = "biorun_logs"
//!
//! [tools.hisat2]
//! index = "/ref/grch38"
//! args = { "-p" = 8, "--dta" = "" }
//! ```

use biorun_application::tools::{
    cufflinks, hisat2, kallisto, salmon, samtools, stringtie, trim_galore,
};
use biorun_domain::{ArgumentMap, ExecutionOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Tool sections understood under `[tools.<name>]`
pub const TOOL_SECTIONS: [&str; 7] = [
    cufflinks::PROGRAM,
    hisat2::PROGRAM,
    kallisto::PROGRAM,
    salmon::PROGRAM,
    samtools::PROGRAM,
    stringtie::PROGRAM,
    trim_galore::PROGRAM,
];

/// Non-fatal problems found in a loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    UnknownToolSection(String),
    VerboseAndQuiet,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnknownToolSection(name) => write!(
                f,
                "unknown tool section [tools.{}] (expected one of: {})",
                name,
                TOOL_SECTIONS.join(", ")
            ),
            ConfigWarning::VerboseAndQuiet => {
                write!(f, "execution.verbose and execution.quiet are both set; quiet wins")
            }
        }
    }
}

/// Raw execution configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Stream tool output to the console
    pub verbose: bool,
    /// Discard tool output
    pub quiet: bool,
    /// Record every execution in the JSONL history
    pub log: bool,
    /// Directory for the JSONL history and the tracing log file
    pub log_dir: Option<PathBuf>,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            log: true,
            log_dir: None,
        }
    }
}

/// Raw per-tool configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolConfig {
    /// Index prefix (hisat2), index file (kallisto) or index directory (salmon)
    pub index: Option<PathBuf>,
    /// Reference annotation (stringtie, cufflinks)
    pub reference_gtf: Option<PathBuf>,
    /// Persisted default arguments
    pub args: ArgumentMap,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub execution: FileExecutionConfig,
    pub tools: BTreeMap<String, FileToolConfig>,
}

impl FileConfig {
    /// Check for suspicious but loadable settings
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings: Vec<ConfigWarning> = self
            .tools
            .keys()
            .filter(|name| !TOOL_SECTIONS.contains(&name.as_str()))
            .map(|name| ConfigWarning::UnknownToolSection(name.clone()))
            .collect();

        if self.execution.verbose && self.execution.quiet {
            warnings.push(ConfigWarning::VerboseAndQuiet);
        }

        warnings
    }

    /// Configuration of one tool, empty when the section is absent
    pub fn tool(&self, name: &str) -> FileToolConfig {
        self.tools.get(name).cloned().unwrap_or_default()
    }

    /// Execution options seeded from `[execution]`
    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions::new()
            .verbose(self.execution.verbose)
            .quiet(self.execution.quiet)
            .log(self.execution.log)
    }
}
