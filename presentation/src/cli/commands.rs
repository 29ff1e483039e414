//! CLI command definitions

use biorun_application::tools::{cufflinks, hisat2, samtools, stringtie};
use biorun_domain::{ArgumentMap, OptionValue, ReadSet, naming};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for step results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}

/// CLI arguments for biorun
#[derive(Parser, Debug)]
#[command(name = "biorun")]
#[command(author, version, about = "Uniform invocation of bioinformatics command-line tools")]
#[command(long_about = r#"
biorun wraps external bioinformatics programs behind one argument model.

Every tool has persisted defaults (from configuration) and per-call overrides
(-o KEY=VALUE). Overrides win key by key; options a tool does not recognize
are reported and dropped, never passed on.

Configuration files are loaded from (in priority order):
1. BIORUN_* environment variables
2. --config <path>           Explicit config file
3. ./biorun.toml             Project-level config
4. ~/.config/biorun/config.toml   Global config

Example:
  biorun check
  biorun hisat2 align --index /ref/grch38 -o -p=8 SRR001_1.fq SRR001_2.fq
  biorun samtools sort -o -@=4 SRR001_hisat2.bam
  biorun run fastqc --allow -t -o -t=4 -- reads.fq
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Discard the output of external tools
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Stream the output of external tools to the console
    #[arg(long, global = true)]
    pub verbose_tools: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Tag attached to execution records (defaults to the run accession)
    #[arg(long, value_name = "TAG", global = true)]
    pub tag: Option<String>,

    /// Output format for step results
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report which external programs are installed
    Check {
        /// Programs to look up (default: every program biorun can run)
        programs: Vec<String>,
    },

    /// Show configuration file locations
    Config,

    /// SAM/BAM conversion, sorting and merging
    #[command(subcommand)]
    Samtools(SamtoolsCommand),

    /// Transcript assembly with stringtie
    #[command(subcommand)]
    Stringtie(StringtieCommand),

    /// Read alignment with hisat2
    #[command(subcommand)]
    Hisat2(Hisat2Command),

    /// Pseudo-alignment and quantification with kallisto
    #[command(subcommand)]
    Kallisto(KallistoCommand),

    /// Quantification with salmon
    #[command(subcommand)]
    Salmon(SalmonCommand),

    /// Adapter and quality trimming with trim_galore
    TrimGalore(TrimGaloreArgs),

    /// Transcript assembly and the cuff* suite
    #[command(subcommand)]
    Cufflinks(CufflinksCommand),

    /// Run any program with an explicit option whitelist
    Run(RunArgs),
}

/// Repeated `-o KEY=VALUE` / `-o KEY` options passed to the tool
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Tool option, e.g. `-o -p=8` or `-o --dta` (repeatable)
    #[arg(
        short = 'o',
        long = "opt",
        value_name = "KEY[=VALUE]",
        value_parser = parse_override,
        allow_hyphen_values = true
    )]
    pub options: Vec<(String, OptionValue)>,
}

impl OverrideArgs {
    /// Build the override layer; a repeated key keeps its last value
    pub fn to_map(&self) -> ArgumentMap {
        self.options.iter().cloned().collect()
    }
}

/// Parse `KEY=VALUE` into a value option and a bare `KEY` into a flag.
///
/// Only the first `=` separates; `KEY=` is a flag.
pub fn parse_override(raw: &str) -> Result<(String, OptionValue), String> {
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) => (key, OptionValue::value(value)),
        None => (raw, OptionValue::Flag),
    };
    if key.is_empty() {
        return Err(format!("missing option name in '{}'", raw));
    }
    Ok((key.to_string(), value))
}

/// One run's reads: one file for single-end, two for paired-end
#[derive(Args, Debug, Clone)]
pub struct ReadsArgs {
    /// FASTQ file(s)
    #[arg(required = true, num_args = 1..=2, value_name = "FASTQ")]
    pub reads: Vec<PathBuf>,

    /// Run accession (default: derived from the first read file)
    #[arg(long)]
    pub accession: Option<String>,

    /// Directory for derived outputs (default: directory of the first read file)
    #[arg(long, value_name = "DIR")]
    pub location: Option<PathBuf>,
}

impl ReadsArgs {
    pub fn read_set(&self) -> Result<ReadSet, String> {
        let (first, second) = match self.reads.as_slice() {
            [first] => (first, None),
            [first, second] => (first, Some(second)),
            _ => return Err("expected one or two read files".to_string()),
        };

        let accession = self
            .accession
            .clone()
            .unwrap_or_else(|| naming::read_base_name(first));
        let location = self
            .location
            .clone()
            .unwrap_or_else(|| naming::parent_dir(first));

        Ok(match second {
            Some(second) => ReadSet::paired(accession, location, first, second),
            None => ReadSet::single(accession, location, first),
        })
    }
}

/// Where samtools writes its result
#[derive(Args, Debug, Clone)]
pub struct SamtoolsOutputArgs {
    /// Output directory (default: the input's directory, created when missing)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Suffix appended to the input's stem
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Delete the input once the output exists
    #[arg(long)]
    pub delete_input: bool,
}

#[derive(Subcommand, Debug)]
pub enum SamtoolsCommand {
    /// Convert SAM to BAM (`samtools view -b`)
    SamToBam {
        sam: PathBuf,
        #[command(flatten)]
        output: SamtoolsOutputArgs,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Sort a BAM file into `<stem><suffix>_sorted.bam`
    Sort {
        bam: PathBuf,
        #[command(flatten)]
        output: SamtoolsOutputArgs,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Convert SAM to BAM, then sort it
    SamSortedBam {
        sam: PathBuf,
        /// Delete the SAM once converted
        #[arg(long)]
        delete_sam: bool,
        #[command(flatten)]
        output: SamtoolsOutputArgs,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Merge two or more BAM files
    Merge {
        #[arg(required = true, num_args = 2.., value_name = "BAM")]
        bams: Vec<PathBuf>,
        /// Output file name without extension
        #[arg(long, default_value = samtools::DEFAULT_MERGE_NAME)]
        name: String,
        /// Output directory (default: directory of the first input)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Delete the inputs once merged
        #[arg(long)]
        delete_inputs: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum StringtieCommand {
    /// Assemble a sorted BAM into `<stem><suffix>.gtf`
    Assemble {
        bam: PathBuf,
        /// Reference annotation (overrides configuration)
        #[arg(long, value_name = "GTF")]
        reference_gtf: Option<PathBuf>,
        #[arg(long, default_value = stringtie::DEFAULT_SUFFIX)]
        suffix: String,
        /// Keep an existing output instead of re-running
        #[arg(long)]
        no_overwrite: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Merge assemblies (`stringtie --merge`)
    Merge {
        #[arg(required = true, value_name = "GTF")]
        gtfs: Vec<PathBuf>,
        #[arg(long, value_name = "GTF")]
        reference_gtf: Option<PathBuf>,
        #[arg(long, default_value = stringtie::DEFAULT_MERGE_SUFFIX)]
        suffix: String,
        #[arg(long)]
        no_overwrite: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum Hisat2Command {
    /// Build an index with hisat2-build at `<dir>/<name>`
    BuildIndex {
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
        #[arg(long)]
        name: String,
        /// Reference FASTA file(s)
        #[arg(required = true, value_name = "FASTA")]
        references: Vec<PathBuf>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Align reads into `<location>/<accession><suffix>.sam`
    Align {
        #[command(flatten)]
        reads: ReadsArgs,
        /// Index prefix (overrides configuration)
        #[arg(long, value_name = "PREFIX")]
        index: Option<PathBuf>,
        #[arg(long, default_value = hisat2::DEFAULT_SUFFIX)]
        suffix: String,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum KallistoCommand {
    /// Build an index at `<dir>/<name>`
    Index {
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
        #[arg(long)]
        name: String,
        /// Transcriptome FASTA
        fasta: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Quantify reads against the index
    Quant {
        #[command(flatten)]
        reads: ReadsArgs,
        /// Index file (overrides configuration)
        #[arg(long, value_name = "FILE")]
        index: Option<PathBuf>,
        /// Output directory (default: `<location>/kallisto_out`)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SalmonCommand {
    /// Build an index directory at `<dir>/<name>`
    Index {
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
        #[arg(long)]
        name: String,
        /// Transcriptome FASTA
        fasta: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Quantify reads against the index
    Quant {
        #[command(flatten)]
        reads: ReadsArgs,
        /// Index directory (overrides configuration)
        #[arg(long, value_name = "DIR")]
        index: Option<PathBuf>,
        /// Output directory (default: `<location>/salmon_out`)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Args, Debug)]
pub struct TrimGaloreArgs {
    #[command(flatten)]
    pub reads: ReadsArgs,
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Subcommand, Debug)]
pub enum CufflinksCommand {
    /// Assemble a sorted BAM into `<stem><suffix>.gtf`
    Assemble {
        bam: PathBuf,
        #[arg(long, value_name = "GTF")]
        reference_gtf: Option<PathBuf>,
        #[arg(long, default_value = cufflinks::DEFAULT_SUFFIX)]
        suffix: String,
        #[arg(long)]
        no_overwrite: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Run cuffcompare, cuffdiff, cuffmerge, cuffnorm or cuffquant with the
    /// shared defaults
    Exec {
        program: String,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Positional arguments
        #[arg(last = true)]
        args: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Program to run
    pub program: String,

    /// Subcommand placed right after the program name
    #[arg(long, value_name = "NAME")]
    pub sub: Option<String>,

    /// Option name the program accepts (repeatable)
    #[arg(long = "allow", value_name = "KEY", allow_hyphen_values = true)]
    pub allowed: Vec<String>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Positional arguments
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Overrides plus trailing positional arguments under `"--"`
pub fn with_positional(overrides: &OverrideArgs, args: &[String]) -> ArgumentMap {
    let map = overrides.to_map();
    if args.is_empty() {
        map
    } else {
        map.with_positional(args.iter().cloned())
    }
}
