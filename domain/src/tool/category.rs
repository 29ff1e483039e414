//! Capability tags for external tools

use serde::{Deserialize, Serialize};

/// What kind of work a wrapped tool does.
///
/// A label only; shared behavior lives in the capability traits of the
/// application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Produces read alignments (hisat2, STAR, bowtie2)
    Aligner,
    /// Produces transcript assemblies (stringtie, cufflinks)
    Assembler,
    /// Produces abundance estimates (kallisto, salmon)
    Quantifier,
    /// Read trimming and quality control (trim_galore)
    QualityControl,
    /// Format conversion and general utilities (samtools)
    Utility,
}

impl ToolCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCategory::Aligner => "aligner",
            ToolCategory::Assembler => "assembler",
            ToolCategory::Quantifier => "quantifier",
            ToolCategory::QualityControl => "quality_control",
            ToolCategory::Utility => "utility",
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
