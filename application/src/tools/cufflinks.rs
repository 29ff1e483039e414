//! Cufflinks suite (cufflinks, cuffcompare, cuffquant, cuffdiff, cuffnorm,
//! cuffmerge)
//!
//! All six programs share one facade: the whitelist is the union of their
//! option sets and the reference GTF default applies to each.

use super::env::ToolEnv;
use super::error::ToolError;
use super::facade::ToolFacade;
use super::traits::{Assembler, ExternalTool};
use biorun_domain::{
    ArgumentMap, ExecutionOptions, StepFailure, StepResult, ToolCategory, Whitelist, naming,
};
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "cufflinks";
pub const REFERENCE_FLAG: &str = "-g";
pub const DEFAULT_SUFFIX: &str = "_cufflinks";
const TRANSCRIPTS_FILE: &str = "transcripts.gtf";

pub const CUFF_PROGRAMS: [&str; 6] = [
    "cuffcompare",
    "cuffdiff",
    "cufflinks",
    "cuffmerge",
    "cuffnorm",
    "cuffquant",
];

const CUFFLINKS_OPTIONS: &[&str] = &[
    "-h", "--help", "-o", "--output-dir", "-p", "--num-threads", "--seed", "-G", "--GTF", "-g",
    "--GTF-guide", "-M", "--mask-file", "-b", "--frag-bias-correct", "-u",
    "--multi-read-correct", "--library-type", "--library-norm-method", "-m", "--frag-len-mean",
    "-s", "--frag-len-std-dev", "--max-mle-iterations", "--compatible-hits-norm",
    "--total-hits-norm", "--num-frag-count-draws", "--num-frag-assign-draws",
    "--max-frag-multihits", "--no-effective-length-correction", "--no-length-correction", "-N",
    "--upper-quartile-norm", "--raw-mapped-norm", "-L", "--label", "-F",
    "--min-isoform-fraction", "-j", "--pre-mrna-fraction", "-I", "--max-intron-length", "-a",
    "--junc-alpha", "-A", "--small-anchor-fraction", "--min-frags-per-transfrag",
    "--overhang-tolerance", "--max-bundle-length", "--max-bundle-frags", "--min-intron-length",
    "--trim-3-avgcov-thresh", "--trim-3-dropoff-frac", "--max-multiread-fraction",
    "--overlap-radius", "--no-faux-reads", "--3-overhang-tolerance",
    "--intron-overhang-tolerance", "-v", "--verbose", "-q", "--quiet", "--no-update-check",
];

const CUFFCOMPARE_OPTIONS: &[&str] = &[
    "-h", "-i", "-r", "-R", "-Q", "-M", "-N", "-s", "-e", "-d", "-p", "-C", "-F", "-G", "-T",
    "-V",
];

const CUFFQUANT_OPTIONS: &[&str] = &[
    "-o", "--output-dir", "-p", "--num-threads", "-M", "--mask-file", "-b",
    "--frag-bias-correct", "-u", "--multi-read-correct", "--library-type", "-m",
    "--frag-len-mean", "-s", "--frag-len-std-dev", "-c", "--min-alignment-count",
    "--max-mle-iterations", "-v", "--verbose", "-q", "--quiet", "--seed", "--no-update-check",
    "--max-bundle-frags", "--max-frag-multihits", "--no-effective-length-correction",
    "--no-length-correction", "--read-skip-fraction", "--no-read-pairs", "--trim-read-length",
    "--no-scv-correction",
];

const CUFFDIFF_OPTIONS: &[&str] = &[
    "-o", "--output-dir", "-L", "--labels", "--FDR", "-M", "--mask-file", "-C",
    "--contrast-file", "-b", "--frag-bias-correct", "-u", "--multi-read-correct", "-p",
    "--num-threads", "--no-diff", "--no-js-tests", "-T", "--time-series", "--library-type",
    "--dispersion-method", "--library-norm-method", "-m", "--frag-len-mean", "-s",
    "--frag-len-std-dev", "-c", "--min-alignment-count", "--max-mle-iterations",
    "--compatible-hits-norm", "--total-hits-norm", "-v", "--verbose", "-q", "--quiet", "--seed",
    "--no-update-check", "--emit-count-tables", "--max-bundle-frags", "--num-frag-count-draws",
    "--num-frag-assign-draws", "--max-frag-multihits", "--min-outlier-p",
    "--min-reps-for-js-test", "--no-effective-length-correction", "--no-length-correction",
    "-N", "--upper-quartile-norm", "--geometric-norm", "--raw-mapped-norm",
    "--poisson-dispersion", "--read-skip-fraction", "--no-read-pairs", "--trim-read-length",
    "--no-scv-correction",
];

const CUFFNORM_OPTIONS: &[&str] = &[
    "-o", "--output-dir", "-L", "--labels", "--norm-standards-file", "-p", "--num-threads",
    "--library-type", "--library-norm-method", "--output-format", "--compatible-hits-norm",
    "--total-hits-norm", "-v", "--verbose", "-q", "--quiet", "--seed", "--no-update-check",
];

const CUFFMERGE_OPTIONS: &[&str] = &[
    "-h", "--help", "-o", "-g", "--ref-gtf", "-p", "--num-threads", "-s", "--ref-sequence",
];

fn whitelist() -> Whitelist {
    let parts = [
        CUFFLINKS_OPTIONS,
        CUFFCOMPARE_OPTIONS,
        CUFFQUANT_OPTIONS,
        CUFFDIFF_OPTIONS,
        CUFFNORM_OPTIONS,
        CUFFMERGE_OPTIONS,
    ]
    .map(|options| Whitelist::new(options.iter().copied()));
    Whitelist::union(&parts)
}

pub struct Cufflinks {
    facade: ToolFacade,
}

impl Cufflinks {
    /// `reference_gtf` is passed as `-g` when the file exists.
    pub fn new(
        env: ToolEnv,
        reference_gtf: Option<&Path>,
        defaults: ArgumentMap,
    ) -> Result<Self, ToolError> {
        let mut facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::Assembler,
            whitelist(),
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

    /// Run one of the cuff* programs with the shared defaults.
    pub fn run_cuff_command(
        &self,
        program: &str,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<()> {
        let result = if CUFF_PROGRAMS.contains(&program) {
            self.facade.run_as(program, overrides, options)
        } else {
            Err(StepFailure::invalid_input(format!(
                "Unknown command {}; expected one of {}",
                program,
                CUFF_PROGRAMS.join(", ")
            )))
        };
        self.facade.finish(program, result)
    }

    /// Assemble `bam` with cufflinks into the BAM's directory and rename
    /// `transcripts.gtf` to `<bam stem><out_suffix>.gtf`.
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
        let result = self.try_assemble(bam, &out_gtf, overrides, options);
        self.facade.finish("assemble", result)
    }

    fn try_assemble(
        &self,
        bam: &Path,
        out_gtf: &Path,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.facade.require_files(&[bam])?;

        let out_dir = naming::parent_dir(bam);
        let required = ArgumentMap::new()
            .with("-o", &out_dir)
            .with_positional([bam.display().to_string()]);
        self.facade
            .run_step(None, &overrides.merged_with(&required), options)?;

        let transcripts = self.facade.verify_output(out_dir.join(TRANSCRIPTS_FILE))?;
        self.facade
            .env()
            .fs()
            .rename(&transcripts, out_gtf)
            .map_err(|e| StepFailure::Filesystem {
                path: transcripts.clone(),
                reason: e.to_string(),
            })?;
        self.facade.verify_output(out_gtf)
    }
}

impl ExternalTool for Cufflinks {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}

impl Assembler for Cufflinks {
    fn assemble(
        &self,
        bam: &Path,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.assemble_with(bam, DEFAULT_SUFFIX, true, overrides, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, ScriptedRunner};
    use std::fs;

    #[test]
    fn test_whitelist_covers_suite() {
        let whitelist = whitelist();
        for name in ["--GTF-guide", "-R", "--FDR", "--output-format", "--ref-gtf", "-c"] {
            assert!(whitelist.contains(name), "{} missing", name);
        }
    }

    #[test]
    fn test_run_cuff_command_rejects_other_programs() {
        let harness = Harness::new(ScriptedRunner::new());
        let cufflinks = Cufflinks::new(harness.env.clone(), None, ArgumentMap::new()).unwrap();

        let err = cufflinks
            .run_cuff_command("rm", &ArgumentMap::new(), &ExecutionOptions::new())
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(harness.runner.commands().is_empty());
    }

    #[test]
    fn test_run_cuff_command_uses_shared_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let gtf = dir.path().join("ref.gtf");
        fs::write(&gtf, "").unwrap();
        let harness = Harness::new(ScriptedRunner::new());
        let cufflinks = Cufflinks::new(harness.env.clone(), Some(&gtf), ArgumentMap::new()).unwrap();

        cufflinks
            .run_cuff_command(
                "cuffmerge",
                &ArgumentMap::new()
                    .with("-o", "merged")
                    .with_positional(["assemblies.txt"]),
                &ExecutionOptions::new(),
            )
            .unwrap();

        assert_eq!(
            harness.runner.tokens(0),
            vec![
                "cuffmerge".to_string(),
                "-g".to_string(),
                gtf.display().to_string(),
                "-o".to_string(),
                "merged".to_string(),
                "assemblies.txt".to_string(),
            ]
        );
    }

    #[test]
    fn test_assemble_renames_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        let bam = dir.path().join("SRR1.bam");
        fs::write(&bam, "").unwrap();
        let harness = Harness::new(
            ScriptedRunner::new().creating([dir.path().join(TRANSCRIPTS_FILE)]),
        );
        let cufflinks = Cufflinks::new(harness.env.clone(), None, ArgumentMap::new()).unwrap();

        let out = cufflinks
            .assemble(&bam, &ArgumentMap::new(), &ExecutionOptions::new())
            .unwrap();

        assert_eq!(out, dir.path().join("SRR1_cufflinks.gtf"));
        assert!(out.is_file());
        assert!(!dir.path().join(TRANSCRIPTS_FILE).exists());
        assert_eq!(
            harness.runner.tokens(0),
            vec![
                "cufflinks".to_string(),
                "-o".to_string(),
                dir.path().display().to_string(),
                bam.display().to_string(),
            ]
        );
    }

    #[test]
    fn test_assemble_without_transcripts_is_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let bam = dir.path().join("SRR1.bam");
        fs::write(&bam, "").unwrap();
        let harness = Harness::new(ScriptedRunner::new());
        let cufflinks = Cufflinks::new(harness.env.clone(), None, ArgumentMap::new()).unwrap();

        let err = cufflinks
            .assemble(&bam, &ArgumentMap::new(), &ExecutionOptions::new())
            .unwrap_err();

        assert_eq!(
            err,
            StepFailure::missing_output(dir.path().join(TRANSCRIPTS_FILE))
        );
    }
}
