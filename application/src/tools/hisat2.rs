//! HISAT2 spliced read aligner

use super::env::ToolEnv;
use super::error::ToolError;
use super::facade::ToolFacade;
use super::traits::{Aligner, ExternalTool, IndexedTool};
use crate::ports::diagnostics::Diagnostic;
use biorun_domain::{
    ArgumentMap, ExecutionOptions, ReadLayout, ReadSet, StepFailure, StepResult, ToolCategory,
    Whitelist,
};
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "hisat2";
pub const BUILD_PROGRAM: &str = "hisat2-build";
pub const INDEX_FLAG: &str = "-x";
pub const DEFAULT_SUFFIX: &str = "_hisat2";

const OPTIONS: &[&str] = &[
    "-x", "-1", "-2", "-U", "--sra-acc", "-S", "-q", "--qseq", "-f", "-r", "-c", "-s", "-u",
    "-5", "-3", "--phred33", "--phred64", "--int-quals", "--n-ceil", "--ignore-quals", "--nofw",
    "--norc", "--pen-cansplice", "--pen-noncansplice", "--pen-canintronlen",
    "--pen-noncanintronlen", "--min-intronlen", "--max-intronlen", "--known-splicesite-infile",
    "--novel-splicesite-outfile", "--novel-splicesite-infile", "--no-temp-splicesite",
    "--no-spliced-alignment", "--rna-strandness", "--tmo", "--dta", "--dta-cufflinks",
    "--avoid-pseudogene", "--no-templatelen-adjustment", "--mp", "--sp", "--no-softclip", "--np",
    "--rdg", "--rfg", "--score-min", "-k", "-I", "-X", "--fr", "--rf", "--ff", "--no-mixed",
    "--no-discordant", "-t", "--un", "--al", "--un-conc", "--al-conc", "--un-gz",
    "--summary-file", "--new-summary", "--quiet", "--met-file", "--met-stderr", "--met",
    "--no-head", "--no-sq", "--rg-id", "--rg", "-o", "-p", "--reorder", "--mm", "--qc-filter",
    "--seed", "--non-deterministic", "--remove-chrname", "--add-chrname", "--version",
];

const BUILD_OPTIONS: &[&str] = &[
    "-c", "--large-index", "-a", "-p", "--bmax", "--bmaxdivn", "--dcv", "--nodc", "-r", "-3",
    "-o", "-t", "--localoffrate", "--localftabchars", "--snp", "--haplotype", "--ss", "--exon",
    "--seed", "-q", "-h", "--usage", "--version",
];

/// File whose presence marks a usable index built under `prefix`
pub fn index_marker(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(".1.ht2");
    PathBuf::from(name)
}

pub struct Hisat2 {
    facade: ToolFacade,
}

impl Hisat2 {
    /// `index` is the prefix passed to `-x`; it is only used when
    /// `<index>.1.ht2` exists.
    pub fn new(env: ToolEnv, index: Option<&Path>, defaults: ArgumentMap) -> Result<Self, ToolError> {
        let mut facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::Aligner,
            Whitelist::new(OPTIONS.iter().copied()),
            defaults,
        )?;

        if let Some(index) = index {
            if facade.env().fs().is_file(&index_marker(index)) {
                facade.set_resource(INDEX_FLAG, index);
            }
        }

        let hisat2 = Self { facade };
        if !hisat2.check_index() {
            hisat2.facade.env().diagnostics().report(Diagnostic::Notice(
                "No valid HISAT2 index provided; build one before aligning".to_string(),
            ));
        }
        Ok(hisat2)
    }

    /// Build an index from `references` at `dir/name` and use it for
    /// subsequent alignments.
    pub fn build_index(
        &mut self,
        dir: &Path,
        name: &str,
        references: &[PathBuf],
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let result = self.try_build_index(dir, name, references, overrides, options);
        self.facade.finish("build-index", result)
    }

    fn try_build_index(
        &mut self,
        dir: &Path,
        name: &str,
        references: &[PathBuf],
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        if references.is_empty() {
            return Err(StepFailure::invalid_input(
                "No reference sequence provided to hisat2-build",
            ));
        }
        self.facade.require_files(references)?;
        self.facade.prepare_out_dir(dir)?;

        let prefix = dir.join(name);
        let joined = references
            .iter()
            .map(|r| r.display().to_string())
            .collect::<Vec<_>>()
            .join(",");
        let arguments = overrides
            .clone()
            .with_positional([joined, prefix.display().to_string()]);

        self.facade.run_companion(
            BUILD_PROGRAM,
            None,
            &Whitelist::new(BUILD_OPTIONS.iter().copied()),
            &arguments,
            options,
        )?;
        self.facade.verify_output(index_marker(&prefix))?;

        self.facade.set_resource(INDEX_FLAG, prefix.as_path());
        Ok(prefix)
    }

    /// Align `reads` to `<location>/<accession><out_suffix>.sam`.
    pub fn align_with_suffix(
        &self,
        reads: &ReadSet,
        out_suffix: &str,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let options = options.tagged_or(&reads.accession);
        let result = self.try_align(reads, out_suffix, overrides, &options);
        self.facade.finish("align", result)
    }

    fn try_align(
        &self,
        reads: &ReadSet,
        out_suffix: &str,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        if !self.check_index() {
            return Err(StepFailure::MissingIndex {
                program: PROGRAM.to_string(),
            });
        }
        self.facade.require_files(&reads.files())?;

        let out_sam = reads
            .location
            .join(format!("{}{}.sam", reads.accession, out_suffix));
        let inputs = match &reads.layout {
            ReadLayout::Paired { fastq1, fastq2 } => {
                ArgumentMap::new().with("-1", fastq1).with("-2", fastq2)
            }
            ReadLayout::Single { fastq } => ArgumentMap::new().with("-U", fastq),
        };
        let required = inputs.with("-S", &out_sam);

        self.facade
            .run_step(None, &overrides.merged_with(&required), options)?;
        self.facade.verify_output(out_sam)
    }
}

impl ExternalTool for Hisat2 {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}

impl IndexedTool for Hisat2 {
    fn index_flag(&self) -> &'static str {
        INDEX_FLAG
    }

    fn check_index(&self) -> bool {
        self.index()
            .is_some_and(|prefix| self.facade.env().fs().is_file(&index_marker(&prefix)))
    }
}

impl Aligner for Hisat2 {
    fn align(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.align_with_suffix(reads, DEFAULT_SUFFIX, overrides, options)
    }
}
