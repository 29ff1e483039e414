//! kallisto pseudo-alignment quantifier

use super::env::ToolEnv;
use super::error::ToolError;
use super::facade::ToolFacade;
use super::traits::{ExternalTool, IndexedTool, Quantifier};
use crate::ports::diagnostics::Diagnostic;
use biorun_domain::{
    ArgumentMap, ExecutionOptions, ReadLayout, ReadSet, StepFailure, StepResult, ToolCategory,
    Whitelist,
};
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "kallisto";
pub const INDEX_FLAG: &str = "-i";
pub const DEFAULT_OUT_DIR: &str = "kallisto_out";
pub const ABUNDANCE_FILE: &str = "abundance.tsv";

const INDEX_OPTIONS: &[&str] = &["-i", "--index", "-k", "--kmer-size", "--make-unique"];

const QUANT_OPTIONS: &[&str] = &[
    "-i", "--index", "-o", "--output-dir", "--bias", "-b", "--bootstrap-samples", "--seed",
    "--plaintext", "--fusion", "--single", "--fr-stranded", "--rf-stranded", "-l",
    "--fragment-length", "-s", "--sd", "-t", "--threads", "--pseudobam",
];

const PSEUDO_OPTIONS: &[&str] = &[
    "-i", "--index", "-o", "--output-dir", "-u", "--umi", "-b", "--batch", "--single", "-l",
    "--fragment-length", "-s", "--sd", "-t", "--threads", "--pseudobam",
];

const H5DUMP_OPTIONS: &[&str] = &["-o", "--output-dir"];

fn whitelist() -> Whitelist {
    let parts = [INDEX_OPTIONS, QUANT_OPTIONS, PSEUDO_OPTIONS, H5DUMP_OPTIONS]
        .map(|options| Whitelist::new(options.iter().copied()));
    Whitelist::union(&parts)
}

pub struct Kallisto {
    facade: ToolFacade,
}

impl Kallisto {
    /// `index` is used when the file exists.
    pub fn new(env: ToolEnv, index: Option<&Path>, defaults: ArgumentMap) -> Result<Self, ToolError> {
        let mut facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::Quantifier,
            whitelist(),
            defaults,
        )?;

        if let Some(index) = index {
            if facade.env().fs().is_file(index) {
                facade.set_resource(INDEX_FLAG, index);
            }
        }

        let kallisto = Self { facade };
        if !kallisto.check_index() {
            kallisto.facade.env().diagnostics().report(Diagnostic::Notice(
                "No kallisto index provided; build one before quantifying".to_string(),
            ));
        }
        Ok(kallisto)
    }

    /// `kallisto index -i <dir/name> <fasta>`; the new index is used for
    /// subsequent runs.
    pub fn build_index(
        &mut self,
        dir: &Path,
        name: &str,
        fasta: &Path,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let result = self.try_build_index(dir, name, fasta, overrides, options);
        self.facade.finish("index", result)
    }

    fn try_build_index(
        &mut self,
        dir: &Path,
        name: &str,
        fasta: &Path,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.facade.require_files(&[fasta])?;
        self.facade.prepare_out_dir(dir)?;

        let index = dir.join(name);
        let required = ArgumentMap::new()
            .with(INDEX_FLAG, &index)
            .with_positional([fasta.display().to_string()]);

        self.facade
            .run_step(Some("index"), &overrides.merged_with(&required), options)?;
        let index = self.facade.verify_output(index)?;

        self.facade.set_resource(INDEX_FLAG, index.as_path());
        Ok(index)
    }

    /// `kallisto quant` into `out_dir` (default `<location>/kallisto_out`),
    /// returning the directory once `abundance.tsv` exists.
    pub fn quant(
        &self,
        reads: &ReadSet,
        out_dir: Option<&Path>,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let options = options.tagged_or(&reads.accession);
        let result = self.try_quant(reads, out_dir, overrides, &options);
        self.facade.finish("quant", result)
    }

    fn try_quant(
        &self,
        reads: &ReadSet,
        out_dir: Option<&Path>,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        if !self.check_index() {
            return Err(StepFailure::MissingIndex {
                program: PROGRAM.to_string(),
            });
        }
        self.facade.require_files(&reads.files())?;

        let out_dir = out_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| reads.location.join(DEFAULT_OUT_DIR));
        let required = match &reads.layout {
            ReadLayout::Paired { fastq1, fastq2 } => ArgumentMap::new()
                .with("-o", &out_dir)
                .with_positional([fastq1.display().to_string(), fastq2.display().to_string()]),
            ReadLayout::Single { fastq } => ArgumentMap::new()
                .with("-o", &out_dir)
                .with_flag("--single")
                .with_positional([fastq.display().to_string()]),
        };

        self.facade
            .run_step(Some("quant"), &overrides.merged_with(&required), options)?;
        self.facade.verify_output(out_dir.join(ABUNDANCE_FILE))?;
        Ok(out_dir)
    }
}

impl ExternalTool for Kallisto {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}

impl IndexedTool for Kallisto {
    fn index_flag(&self) -> &'static str {
        INDEX_FLAG
    }

    fn check_index(&self) -> bool {
        self.index()
            .is_some_and(|index| self.facade.env().fs().is_file(&index))
    }
}

impl Quantifier for Kallisto {
    fn quantify(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.quant(reads, None, overrides, options)
    }
}
