//! Trim Galore adapter and quality trimming

use super::env::ToolEnv;
use super::error::ToolError;
use super::facade::ToolFacade;
use super::traits::{ExternalTool, ReadTrimmer};
use biorun_domain::{
    ArgumentMap, ExecutionOptions, ReadLayout, ReadSet, StepResult, ToolCategory, Whitelist,
    naming,
};
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "trim_galore";
pub const OUT_DIR_FLAG: &str = "-o";
pub const GZIP_FLAG: &str = "--gzip";
pub const DONT_GZIP_FLAG: &str = "--dont_gzip";
pub const BASENAME_FLAG: &str = "--basename";
const DEPENDENCIES: [&str; 2] = [PROGRAM, "cutadapt"];

const OPTIONS: &[&str] = &[
    "-h", "-v", "-q", "--phred33", "--phred64", "--fastqc", "--fastqc_args", "-a", "-a2",
    "--illumina", "--nextera", "--small_rna", "--consider_already_trimmed", "--max_length",
    "--stringency", "-e", "--gzip", "--dont_gzip", "--length", "--max_n", "--trim-n", "-o",
    "--no_report_file", "--suppress_warn", "--clip_R1", "--clip_R2", "--three_prime_clip_R1",
    "--three_prime_clip_R2", "--2colour", "--path_to_cutadapt", "--basename", "-j",
    "--hardtrim5", "--hardtrim3", "--clock", "--polyA", "--rrbs", "--non_directional", "--keep",
    "--paired", "-t", "--retain_unpaired", "-r1", "-r2",
];

pub struct TrimGalore {
    facade: ToolFacade,
}

impl TrimGalore {
    /// Requires both `trim_galore` and `cutadapt`. An output directory
    /// configured under `-o` is created up front.
    pub fn new(env: ToolEnv, defaults: ArgumentMap) -> Result<Self, ToolError> {
        env.require(&DEPENDENCIES)?;
        let facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::QualityControl,
            Whitelist::new(OPTIONS.iter().copied()),
            defaults,
        )?;
        if let Some(dir) = facade.resource(OUT_DIR_FLAG) {
            facade.ensure_resource_dir(Path::new(dir))?;
        }
        Ok(Self { facade })
    }

    fn try_trim(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<ReadSet> {
        let files = reads.files();
        self.facade.require_files(&files)?;

        let merged = self.facade.defaults().merged_with(overrides);
        let out_dir = match merged.get(OUT_DIR_FLAG).and_then(|v| v.as_value()) {
            Some(dir) => PathBuf::from(dir),
            None => naming::parent_dir(files[0]),
        };
        self.facade.prepare_out_dir(&out_dir)?;

        let mut required = ArgumentMap::new().with(OUT_DIR_FLAG, &out_dir);
        if reads.is_paired() {
            required = required.with_flag("--paired");
        }
        let required =
            required.with_positional(files.iter().map(|f| f.display().to_string()));
        self.facade
            .run_step(None, &overrides.merged_with(&required), options)?;

        let names = TrimmedNaming::from_arguments(&merged);
        let layout = match &reads.layout {
            ReadLayout::Single { fastq } => ReadLayout::Single {
                fastq: self
                    .facade
                    .verify_output(names.path(&out_dir, fastq, "_trimmed"))?,
            },
            ReadLayout::Paired { fastq1, fastq2 } => ReadLayout::Paired {
                fastq1: self
                    .facade
                    .verify_output(names.path(&out_dir, fastq1, "_val_1"))?,
                fastq2: self
                    .facade
                    .verify_output(names.path(&out_dir, fastq2, "_val_2"))?,
            },
        };
        Ok(reads.with_layout(layout))
    }
}

/// Name trim_galore gives its output: `<base><tag>.fq`, plus `.gz` when the
/// input was gzipped. `--basename`, `--gzip` and `--dont_gzip` change it.
#[derive(Debug, Default)]
pub struct TrimmedNaming {
    basename: Option<String>,
    /// `Some(true)` forces `.gz`, `Some(false)` forbids it
    gzip: Option<bool>,
}

impl TrimmedNaming {
    pub fn from_arguments(arguments: &ArgumentMap) -> Self {
        let gzip = if arguments.contains_key(DONT_GZIP_FLAG) {
            Some(false)
        } else if arguments.contains_key(GZIP_FLAG) {
            Some(true)
        } else {
            None
        };
        Self {
            basename: arguments
                .get(BASENAME_FLAG)
                .and_then(|v| v.as_value())
                .map(str::to_string),
            gzip,
        }
    }

    pub fn path(&self, out_dir: &Path, input: &Path, tag: &str) -> PathBuf {
        let gzip = self.gzip.unwrap_or_else(|| naming::is_gzipped(input));
        let extension = if gzip { ".fq.gz" } else { ".fq" };
        let base = match &self.basename {
            Some(base) => base.clone(),
            None => naming::read_base_name(input),
        };
        out_dir.join(format!("{}{}{}", base, tag, extension))
    }
}

impl ExternalTool for TrimGalore {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}

impl ReadTrimmer for TrimGalore {
    fn trim(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<ReadSet> {
        let options = options.tagged_or(&reads.accession);
        let result = self.try_trim(reads, overrides, &options);
        self.facade.finish("trim", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDependencies, Harness, ScriptedRunner};
    use biorun_domain::StepFailure;
    use std::fs;

    #[test]
    fn test_requires_cutadapt() {
        let harness = Harness::with_dependencies(
            ScriptedRunner::new(),
            FakeDependencies::missing(&["cutadapt"]),
        );
        let result = TrimGalore::new(harness.env.clone(), ArgumentMap::new());
        assert!(matches!(
            result,
            Err(ToolError::MissingDependency { ref program }) if program == "cutadapt"
        ));
    }

    #[test]
    fn test_configured_out_dir_created() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("trimmed");
        let harness = Harness::new(ScriptedRunner::new());

        TrimGalore::new(harness.env.clone(), ArgumentMap::new().with("-o", &out)).unwrap();

        assert!(out.is_dir());
    }

    #[test]
    fn test_trimmed_name() {
        let dir = Path::new("/out");
        let trimmed_name = |out: &Path, input: &Path, tag: &str| {
            TrimmedNaming::default().path(out, input, tag)
        };
        assert_eq!(
            trimmed_name(dir, Path::new("/in/SRR1_1.fastq.gz"), "_val_1"),
            PathBuf::from("/out/SRR1_1_val_1.fq.gz")
        );
        assert_eq!(
            trimmed_name(dir, Path::new("/in/SRR1.fq"), "_trimmed"),
            PathBuf::from("/out/SRR1_trimmed.fq")
        );
    }

    #[test]
    fn test_trimmed_naming_overrides() {
        let dir = Path::new("/out");
        let gz = Path::new("/in/SRR1.fq.gz");
        let plain = Path::new("/in/SRR1.fq");

        let dont_gzip =
            TrimmedNaming::from_arguments(&ArgumentMap::new().with_flag("--dont_gzip"));
        assert_eq!(
            dont_gzip.path(dir, gz, "_trimmed"),
            PathBuf::from("/out/SRR1_trimmed.fq")
        );

        let gzip = TrimmedNaming::from_arguments(&ArgumentMap::new().with_flag("--gzip"));
        assert_eq!(
            gzip.path(dir, plain, "_trimmed"),
            PathBuf::from("/out/SRR1_trimmed.fq.gz")
        );

        let renamed =
            TrimmedNaming::from_arguments(&ArgumentMap::new().with("--basename", "sample"));
        assert_eq!(
            renamed.path(dir, Path::new("/in/SRR1_1.fastq"), "_val_1"),
            PathBuf::from("/out/sample_val_1.fq")
        );
    }

    #[test]
    fn test_trim_dont_gzip_override() {
        let dir = tempfile::tempdir().unwrap();
        let fq = dir.path().join("SRR1.fq.gz");
        fs::write(&fq, "").unwrap();
        let trimmed = dir.path().join("SRR1_trimmed.fq");
        let harness = Harness::new(ScriptedRunner::new().creating([trimmed.clone()]));
        let trim_galore = TrimGalore::new(harness.env.clone(), ArgumentMap::new()).unwrap();
        let reads = ReadSet::single("SRR1", dir.path(), &fq);

        let result = trim_galore
            .trim(
                &reads,
                &ArgumentMap::new().with_flag("--dont_gzip"),
                &ExecutionOptions::new(),
            )
            .unwrap();

        assert_eq!(result.files(), vec![trimmed.as_path()]);
    }

    #[test]
    fn test_trim_configured_basename() {
        let dir = tempfile::tempdir().unwrap();
        let fq = dir.path().join("SRR4.fastq");
        fs::write(&fq, "").unwrap();
        let trimmed = dir.path().join("liver_trimmed.fq.gz");
        let harness = Harness::new(ScriptedRunner::new().creating([trimmed.clone()]));
        let defaults = ArgumentMap::new()
            .with("--basename", "liver")
            .with_flag("--gzip");
        let trim_galore = TrimGalore::new(harness.env.clone(), defaults).unwrap();
        let reads = ReadSet::single("SRR4", dir.path(), &fq);

        let result = trim_galore
            .trim(&reads, &ArgumentMap::new(), &ExecutionOptions::new())
            .unwrap();

        assert_eq!(result.files(), vec![trimmed.as_path()]);
    }

    #[test]
    fn test_trim_paired() {
        let dir = tempfile::tempdir().unwrap();
        let fq1 = dir.path().join("SRR1_1.fastq");
        let fq2 = dir.path().join("SRR1_2.fastq");
        fs::write(&fq1, "").unwrap();
        fs::write(&fq2, "").unwrap();
        let val1 = dir.path().join("SRR1_1_val_1.fq");
        let val2 = dir.path().join("SRR1_2_val_2.fq");
        let harness = Harness::new(ScriptedRunner::new().creating([val1.clone(), val2.clone()]));
        let trim_galore = TrimGalore::new(harness.env.clone(), ArgumentMap::new()).unwrap();
        let reads = ReadSet::paired("SRR1", dir.path(), &fq1, &fq2);

        let trimmed = trim_galore
            .trim(
                &reads,
                &ArgumentMap::new().with("--length", "36"),
                &ExecutionOptions::new(),
            )
            .unwrap();

        assert_eq!(trimmed.accession, "SRR1");
        assert_eq!(trimmed.files(), vec![val1.as_path(), val2.as_path()]);
        assert_eq!(
            harness.runner.tokens(0),
            vec![
                "trim_galore".to_string(),
                "--length".to_string(),
                "36".to_string(),
                "-o".to_string(),
                dir.path().display().to_string(),
                "--paired".to_string(),
                fq1.display().to_string(),
                fq2.display().to_string(),
            ]
        );
    }

    #[test]
    fn test_trim_single_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let fq = dir.path().join("SRR2.fastq.gz");
        fs::write(&fq, "").unwrap();
        let harness = Harness::new(ScriptedRunner::new());
        let trim_galore = TrimGalore::new(harness.env.clone(), ArgumentMap::new()).unwrap();
        let reads = ReadSet::single("SRR2", dir.path(), &fq);

        let err = trim_galore
            .trim(&reads, &ArgumentMap::new(), &ExecutionOptions::new())
            .unwrap_err();

        assert_eq!(
            err,
            StepFailure::missing_output(dir.path().join("SRR2_trimmed.fq.gz"))
        );
        assert!(!harness.runner.tokens(0).contains(&"--paired".to_string()));
    }

    #[test]
    fn test_trim_honours_out_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        let fq = dir.path().join("SRR3.fq");
        fs::write(&fq, "").unwrap();
        let out_dir = dir.path().join("qc");
        let trimmed = out_dir.join("SRR3_trimmed.fq");
        let harness = Harness::new(ScriptedRunner::new().creating([trimmed.clone()]));
        let trim_galore = TrimGalore::new(harness.env.clone(), ArgumentMap::new()).unwrap();
        let reads = ReadSet::single("SRR3", dir.path(), &fq);

        let result = trim_galore
            .trim(
                &reads,
                &ArgumentMap::new().with("-o", &out_dir),
                &ExecutionOptions::new(),
            )
            .unwrap();

        assert_eq!(result.files(), vec![trimmed.as_path()]);
    }
}
