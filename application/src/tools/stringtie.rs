//! StringTie transcript assembler

use super::env::ToolEnv;
use super::error::ToolError;
use super::facade::ToolFacade;
use super::traits::{Assembler, ExternalTool};
use biorun_domain::{
    ArgumentMap, ExecutionOptions, StepFailure, StepResult, ToolCategory, Whitelist, naming,
};
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "stringtie";
pub const REFERENCE_FLAG: &str = "-G";
pub const DEFAULT_SUFFIX: &str = "_stringtie";
pub const DEFAULT_MERGE_SUFFIX: &str = "_stringtieMerge";

const OPTIONS: &[&str] = &[
    "-G", "--version", "--conservative", "--rf", "--fr", "-o", "-l", "-f", "-L", "-m", "-a",
    "-j", "-t", "-c", "-s", "-v", "-g", "-M", "-p", "-A", "-B", "-b", "-e", "-x", "-u", "-h",
    "--merge", "-F", "-T", "-i",
];

pub struct Stringtie {
    facade: ToolFacade,
}

impl Stringtie {
    /// `reference_gtf` is passed as `-G` when the file exists.
    pub fn new(
        env: ToolEnv,
        reference_gtf: Option<&Path>,
        defaults: ArgumentMap,
    ) -> Result<Self, ToolError> {
        let mut facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::Assembler,
            Whitelist::new(OPTIONS.iter().copied()),
            defaults,
        )?;
        if let Some(gtf) = reference_gtf.filter(|gtf| facade.env().fs().is_file(gtf)) {
            facade.set_resource(REFERENCE_FLAG, gtf);
        }
        Ok(Self { facade })
    }

    pub fn reference_gtf(&self) -> Option<&str> {
        self.facade.resource(REFERENCE_FLAG)
    }

    /// Assemble `bam` into `<bam dir>/<bam stem><out_suffix>.gtf`.
    ///
    /// With `overwrite` false an existing output is returned without
    /// running stringtie.
    pub fn assemble_with(
        &self,
        bam: &Path,
        out_suffix: &str,
        overwrite: bool,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let out_gtf = naming::derive_output(bam, None, out_suffix, ".gtf");
        if self.facade.keep_existing(&out_gtf, overwrite) {
            return Ok(out_gtf);
        }

        let result = self.run_to(
            &out_gtf,
            &[bam],
            ArgumentMap::new(),
            overrides,
            options,
        );
        self.facade.finish("assemble", result)
    }

    /// `stringtie --merge` of `gtfs`, written next to the first input.
    pub fn merge(
        &self,
        gtfs: &[PathBuf],
        out_suffix: &str,
        overwrite: bool,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let Some(first) = gtfs.first() else {
            return self.facade.finish(
                "merge",
                Err(StepFailure::invalid_input("No input GTF for stringtie merge")),
            );
        };

        let out_gtf = naming::derive_output(first, None, out_suffix, ".gtf");
        if self.facade.keep_existing(&out_gtf, overwrite) {
            return Ok(out_gtf);
        }

        let inputs: Vec<&Path> = gtfs.iter().map(PathBuf::as_path).collect();
        let result = self.run_to(
            &out_gtf,
            &inputs,
            ArgumentMap::new().with_flag("--merge"),
            overrides,
            options,
        );
        self.facade.finish("merge", result)
    }

    fn run_to(
        &self,
        out_gtf: &Path,
        inputs: &[&Path],
        mode: ArgumentMap,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.facade.require_files(inputs)?;

        let required = mode
            .with("-o", out_gtf)
            .with_positional(inputs.iter().map(|p| p.display().to_string()));
        self.facade
            .run_step(None, &overrides.merged_with(&required), options)?;
        self.facade.verify_output(out_gtf)
    }
}

impl ExternalTool for Stringtie {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}

impl Assembler for Stringtie {
    fn assemble(
        &self,
        bam: &Path,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.assemble_with(bam, DEFAULT_SUFFIX, true, overrides, options)
    }
}
