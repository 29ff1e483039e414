//! Capability traits implemented by concrete tools
//!
//! Every tool is an [`ExternalTool`]; the rest describe what it can do with
//! the caller's data. Callers that only need "some aligner" take
//! `&dyn Aligner`.

use super::facade::ToolFacade;
use biorun_domain::{
    ArgumentMap, DomainError, ExecutionOptions, ReadSet, StepResult, ToolCategory,
};
use std::path::{Path, PathBuf};

pub trait ExternalTool {
    fn facade(&self) -> &ToolFacade;

    fn program(&self) -> &str {
        self.facade().program()
    }

    fn category(&self) -> ToolCategory {
        self.facade().category()
    }

    /// Run the tool directly, overrides merged over its defaults
    fn run_raw(
        &self,
        subcommand: Option<&str>,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> Result<bool, DomainError> {
        self.facade().run_raw(subcommand, overrides, options)
    }
}

/// A tool that needs a prebuilt index.
pub trait IndexedTool: ExternalTool {
    /// Option under which the index is passed
    fn index_flag(&self) -> &'static str;

    fn index(&self) -> Option<PathBuf> {
        self.facade().resource(self.index_flag()).map(PathBuf::from)
    }

    /// Whether the configured index exists on disk
    fn check_index(&self) -> bool;
}

pub trait Aligner: IndexedTool {
    /// Align `reads`, returning the alignment file
    fn align(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf>;
}

pub trait Assembler: ExternalTool {
    /// Assemble transcripts from a BAM file, returning the GTF
    fn assemble(
        &self,
        bam: &Path,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf>;
}

pub trait Quantifier: IndexedTool {
    /// Quantify `reads`, returning the output directory
    fn quantify(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf>;
}

pub trait ReadTrimmer: ExternalTool {
    /// Trim `reads`, returning the same run with the trimmed files
    fn trim(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<ReadSet>;
}
