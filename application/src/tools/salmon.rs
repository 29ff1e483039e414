//! salmon selective-alignment quantifier

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

pub const PROGRAM: &str = "salmon";
pub const INDEX_FLAG: &str = "-i";
pub const LIB_TYPE_FLAG: &str = "-l";
/// Let salmon infer the library type
pub const DEFAULT_LIB_TYPE: &str = "A";
pub const DEFAULT_OUT_DIR: &str = "salmon_out";
pub const QUANT_FILE: &str = "quant.sf";

const INDEX_OPTIONS: &[&str] = &[
    "-v", "--version", "-h", "--help", "-t", "--transcripts", "-k", "--kmerLen", "-i", "--index",
    "--gencode", "--keepDuplicates", "-p", "--threads", "--perfectHash", "--type", "-s",
    "--sasamp",
];

const QUANT_READS_OPTIONS: &[&str] = &[
    "--help-reads", "-i", "--index", "-l", "--libType", "-r", "--unmatedReads", "-1", "--mates1",
    "-2", "--mates2", "-o", "--output", "--discardOrphansQuasi", "--allowOrphansFMD", "--seqBias",
    "--gcBias", "-p", "--threads", "--incompatPrior", "-g", "--geneMap", "-z", "--writeMappings",
    "--meta", "--alternativeInitMode", "--auxDir", "-c", "--consistentHits", "--dumpEq", "-d",
    "--dumpEqWeights", "--fasterMapping", "--minAssignedFrags", "--reduceGCMemory",
    "--biasSpeedSamp", "--strictIntersect", "--fldMax", "--fldMean", "--fldSD", "-f",
    "--forgettingFactor", "-m", "--maxOcc", "--initUniform", "-w", "--maxReadOcc",
    "--noLengthCorrection", "--noEffectiveLengthCorrection", "--noFragLengthDist",
    "--noBiasLengthThreshold", "--numBiasSamples", "--numAuxModelSamples",
    "--numPreAuxModelSamples", "--useVBOpt", "--rangeFactorizationBins", "--numGibbsSamples",
    "--numBootstraps", "--thinningFactor", "-q", "--perTranscriptPrior", "--vbPrior",
    "--writeOrphanLinks", "--writeUnmappedNames", "-x", "--quasiCoverage",
];

const QUANT_ALIGNMENT_OPTIONS: &[&str] = &[
    "--help-alignment", "-l", "--libType", "-a", "--alignments", "-t", "--targets", "-p",
    "--threads", "--seqBias", "--gcBias", "--incompatPrior", "--useErrorModel", "-o", "--output",
    "--meta", "-g", "--geneMap", "--alternativeInitMode", "--auxDir", "--noBiasLengthThreshold",
    "--dumpEq", "-d", "--dumpEqWeights", "--fldMax", "--fldMean", "--fldSD", "-f",
    "--forgettingFactor", "--minAssignedFrags", "--gencode", "--reduceGCMemory",
    "--biasSpeedSamp", "--mappingCacheMemoryLimit", "-w", "--maxReadOcc",
    "--noEffectiveLengthCorrection", "--noFragLengthDist", "-v", "--useVBOpt",
    "--rangeFactorizationBins", "--perTranscriptPrior", "--vbPrior", "--numErrorBins",
    "--numBiasSamples", "--numPreAuxModelSamples", "--numAuxModelSamples", "-s", "--sampleOut",
    "-u", "--sampleUnaligned", "--numGibbsSamples", "--numBootstraps", "--thinningFactor",
];

const QUANTMERGE_OPTIONS: &[&str] = &["--quants", "--names", "-c", "--column", "-o", "--output"];

fn whitelist() -> Whitelist {
    let parts = [
        INDEX_OPTIONS,
        QUANT_READS_OPTIONS,
        QUANT_ALIGNMENT_OPTIONS,
        QUANTMERGE_OPTIONS,
    ]
    .map(|options| Whitelist::new(options.iter().copied()));
    Whitelist::union(&parts)
}

pub struct Salmon {
    facade: ToolFacade,
}

impl Salmon {
    /// `index` is used when the directory exists.
    pub fn new(env: ToolEnv, index: Option<&Path>, defaults: ArgumentMap) -> Result<Self, ToolError> {
        let mut facade = ToolFacade::new(
            env,
            PROGRAM,
            ToolCategory::Quantifier,
            whitelist(),
            defaults,
        )?;

        if let Some(index) = index
            && is_index_dir(&facade, index)
        {
            facade.set_resource(INDEX_FLAG, index);
        }

        let salmon = Self { facade };
        if !salmon.check_index() {
            salmon.facade.env().diagnostics().report(Diagnostic::Notice(
                "No salmon index provided; build one before quantifying".to_string(),
            ));
        }
        Ok(salmon)
    }

    /// `salmon index -t <fasta> -i <dir/name>`; the new index directory is
    /// used for subsequent runs.
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
            .with("-t", fasta)
            .with(INDEX_FLAG, &index);

        self.facade
            .run_step(Some("index"), &overrides.merged_with(&required), options)?;
        let index = self.facade.verify_output(index)?;

        self.facade.set_resource(INDEX_FLAG, index.as_path());
        Ok(index)
    }

    /// `salmon quant` into `out_dir` (default `<location>/salmon_out`),
    /// returning the directory once `quant.sf` exists. The library type is
    /// `A` unless configured or overridden.
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

        let merged = self.facade.defaults().merged_with(overrides);
        let mut required = ArgumentMap::new();
        if !merged.contains_key(LIB_TYPE_FLAG) && !merged.contains_key("--libType") {
            required = required.with(LIB_TYPE_FLAG, DEFAULT_LIB_TYPE);
        }
        let required = match &reads.layout {
            ReadLayout::Paired { fastq1, fastq2 } => required
                .with("-o", &out_dir)
                .with("-1", fastq1)
                .with("-2", fastq2),
            ReadLayout::Single { fastq } => required.with("-o", &out_dir).with("-r", fastq),
        };

        self.facade
            .run_step(Some("quant"), &overrides.merged_with(&required), options)?;
        self.facade.verify_output(out_dir.join(QUANT_FILE))?;
        Ok(out_dir)
    }
}

/// salmon indexes are directories
fn is_index_dir(facade: &ToolFacade, path: &Path) -> bool {
    let fs = facade.env().fs();
    fs.path_exists(path) && !fs.is_file(path)
}

impl ExternalTool for Salmon {
    fn facade(&self) -> &ToolFacade {
        &self.facade
    }
}

impl IndexedTool for Salmon {
    fn index_flag(&self) -> &'static str {
        INDEX_FLAG
    }

    fn check_index(&self) -> bool {
        self.index()
            .is_some_and(|index| is_index_dir(&self.facade, &index))
    }
}

impl Quantifier for Salmon {
    fn quantify(
        &self,
        reads: &ReadSet,
        overrides: &ArgumentMap,
        options: &ExecutionOptions,
    ) -> StepResult<PathBuf> {
        self.quant(reads, None, overrides, options)
    }
}
