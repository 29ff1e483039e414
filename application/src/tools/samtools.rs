//! samtools format conversion, sorting and merging

use super::env::ToolEnv;
use super::error::ToolError;
use super::facade::ToolFacade;
use super::traits::ExternalTool;
use biorun_domain::{
    ArgumentMap, ExecutionOptions, StepFailure, StepResult, ToolCategory, Whitelist, naming,
};
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "samtools";
pub const DEFAULT_MERGE_NAME: &str = "merged";

const OPTIONS: &[&str] = &[
    "-b", "-C", "-1", "-u", "-h", "-H", "-c", "-o", "-U", "-t", "-L", "-r", "-R", "-q", "-l",
    "-m", "-f", "-F", "-G", "-s", "-M", "-x", "-B", "-?", "-S", "-O", "-T", "-@",
];

/// Where a converted or sorted file goes and what happens to its input.
#[derive(Debug, Clone, Default)]
pub struct OutputSpec {
    /// Defaults to the input's directory; created when missing
    pub out_dir: Option<PathBuf>,
    /// Inserted between the input stem and the extension
    pub suffix: String,
    /// Delete the input once the output is verified
    pub delete_input: bool,
}

impl OutputSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn delete_input(mut self, delete: bool) -> Self {
        self.delete_input = delete;
        self
    }
}

pub struct Samtools {
    facade: ToolFacade,
}

impl Samtools {
    pub fn new(env: ToolEnv, defaults: ArgumentMap) -> Result<Self, ToolError> {
        let facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::Utility,
            Whitelist::new(OPTIONS.iter().copied()),
            defaults,
        )?;
        Ok(Self { facade })
    }

    /// `samtools view -b -o <out>/<stem><suffix>.bam <sam>`
    pub fn sam_to_bam(
        &self,
        sam: &Path,
        output: &OutputSpec,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let result = self.convert(sam, "view", "", output, overrides, options, |required| {
            required.with_flag("-b")
        });
        self.facade.finish("view", result)
    }

    /// `samtools sort -o <out>/<stem><suffix>_sorted.bam <bam>`
    pub fn sort_bam(
        &self,
        bam: &Path,
        output: &OutputSpec,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let result = self.convert(bam, "sort", "_sorted", output, overrides, options, |r| r);
        self.facade.finish("sort", result)
    }

    /// SAM to sorted BAM. The intermediate BAM lands next to the SAM; the
    /// sorted file follows `output`. `delete_sam` removes the SAM after
    /// conversion, `output.delete_input` the intermediate BAM after sorting.
    pub fn sam_sorted_bam(
        &self,
        sam: &Path,
        delete_sam: bool,
        output: &OutputSpec,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let bam = self.sam_to_bam(
            sam,
            &OutputSpec::new().delete_input(delete_sam),
            overrides,
            options,
        )?;
        self.sort_bam(&bam, output, overrides, options)
    }

    /// `samtools merge <out>/<name>.bam <bam>...`; needs at least two inputs.
    pub fn merge_bam(
        &self,
        bams: &[PathBuf],
        out_name: &str,
        out_dir: Option<&Path>,
        delete_inputs: bool,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        let result = self.try_merge(bams, out_name, out_dir, delete_inputs, overrides, options);
        self.facade.finish("merge", result)
    }

    fn try_merge(
        &self,
        bams: &[PathBuf],
        out_name: &str,
        out_dir: Option<&Path>,
        delete_inputs: bool,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        if bams.len() < 2 {
            return Err(StepFailure::invalid_input(
                "Please supply at least 2 files to merge",
            ));
        }
        self.facade.require_files(bams)?;

        let out_dir = self.output_dir(&bams[0], out_dir)?;
        let out_bam = out_dir.join(format!("{}.bam", out_name));

        let positional = std::iter::once(&out_bam)
            .chain(bams)
            .map(|p| p.display().to_string());
        let required = ArgumentMap::new().with_positional(positional);

        self.facade
            .run_step(Some("merge"), &overrides.merged_with(&required), options)?;
        let out_bam = self.facade.verify_output(out_bam)?;

        if delete_inputs {
            self.facade.remove_files(bams);
        }
        Ok(out_bam)
    }

    #[allow(clippy::too_many_arguments)]
    fn convert(
        &self,
        input: &Path,
        subcommand: &str,
        tail: &str,
        output: &OutputSpec,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
        extra: impl FnOnce(ArgumentMap) -> ArgumentMap,
    ) -> StepResult<PathBuf> {
        self.facade.require_files(&[input])?;

        let out_dir = self.output_dir(input, output.out_dir.as_deref())?;
        let out_bam = naming::derive_output(
            input,
            Some(&out_dir),
            &format!("{}{}", output.suffix, tail),
            ".bam",
        );

        let required = extra(
            ArgumentMap::new()
                .with("-o", &out_bam)
                .with_positional([input.display().to_string()]),
        );
        self.facade
            .run_step(Some(subcommand), &overrides.merged_with(&required), options)?;
        let out_bam = self.facade.verify_output(out_bam)?;

        if output.delete_input {
            self.facade.remove_files(&[input]);
        }
        Ok(out_bam)
    }

    fn output_dir(&self, input: &Path, requested: Option<&Path>) -> StepResult<PathBuf> {
        match requested {
            Some(dir) => {
                self.facade.prepare_out_dir(dir)?;
                Ok(dir.to_path_buf())
            }
            None => Ok(naming::parent_dir(input)),
        }
    }
}

impl ExternalTool for Samtools {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}
