//! Subcommand dispatch: build the tool environment, run one operation and
//! print its report.

use anyhow::{Context, Result};
use biorun_application::tools::{
    cufflinks, hisat2, kallisto, salmon, samtools, stringtie, trim_galore,
};
use biorun_application::{
    CommandExecutor, Cufflinks, Hisat2, KNOWN_PROGRAMS, Kallisto, OutputSpec, ReadTrimmer,
    Salmon, Samtools, Stringtie, ToolEnv, ToolFacade, TrimGalore,
};
use biorun_domain::{ExecutionOptions, StepResult, ToolCategory, Whitelist};
use biorun_infrastructure::{
    FileConfig, JsonlExecutionLogger, LocalFileSystem, SystemProcessRunner,
    WhichDependencyChecker, discover_tools,
};
use biorun_presentation::cli::commands::{
    CufflinksCommand, Hisat2Command, KallistoCommand, ReadsArgs, SalmonCommand, SamtoolsCommand,
    SamtoolsOutputArgs, StringtieCommand, with_positional,
};
use biorun_presentation::{
    Cli, Command, ConsoleDiagnostics, ConsoleFormatter, OutputFormat, StepOutput, StepReport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Run the selected subcommand. `Ok(false)` means a step failed.
pub fn run(cli: &Cli, config: &FileConfig) -> Result<bool> {
    let options = execution_options(cli, config);
    let env = tool_env(cli, config);
    let printer = Printer { format: cli.format };

    match &cli.command {
        Command::Check { programs } => Ok(check(programs)),
        Command::Config => Ok(true),
        Command::Samtools(command) => run_samtools(command, &env, config, &options, &printer),
        Command::Stringtie(command) => run_stringtie(command, &env, config, &options, &printer),
        Command::Hisat2(command) => run_hisat2(command, &env, config, &options, &printer),
        Command::Kallisto(command) => run_kallisto(command, &env, config, &options, &printer),
        Command::Salmon(command) => run_salmon(command, &env, config, &options, &printer),
        Command::TrimGalore(args) => {
            let trimmer = TrimGalore::new(env, config.tool(trim_galore::PROGRAM).args)
                .context("Cannot set up trim_galore")?;
            let reads = read_set(&args.reads)?;
            let result = trimmer.trim(&reads, &args.overrides.to_map(), &options);
            Ok(printer.step("trim_galore trim", &result))
        }
        Command::Cufflinks(command) => run_cufflinks(command, &env, config, &options, &printer),
        Command::Run(args) => {
            let facade = ToolFacade::new(
                env,
                args.program.as_str(),
                ToolCategory::Utility,
                Whitelist::new(args.allowed.iter().map(String::as_str)),
                Default::default(),
            )
            .with_context(|| format!("Cannot set up {}", args.program))?;
            let arguments = with_positional(&args.overrides, &args.args);
            let success = facade
                .run_raw(args.sub.as_deref(), &arguments, &options)
                .with_context(|| format!("Invalid arguments for {}", args.program))?;
            Ok(printer.status(&format!("run {}", args.program), success))
        }
    }
}

/// `[execution]` settings, then command-line flags on top
fn execution_options(cli: &Cli, config: &FileConfig) -> ExecutionOptions {
    let mut options = config.execution_options();
    if cli.quiet {
        options = options.quiet(true);
    }
    if cli.verbose_tools {
        options = options.verbose(true);
    }
    if let Some(tag) = &cli.tag {
        options = options.with_tag(tag.as_str());
    }
    options
}

fn tool_env(cli: &Cli, config: &FileConfig) -> ToolEnv {
    let diagnostics = Arc::new(ConsoleDiagnostics::stderr(cli.verbose > 0));
    let mut executor =
        CommandExecutor::new(Arc::new(SystemProcessRunner)).with_diagnostics(diagnostics);

    if let Some(dir) = &config.execution.log_dir
        && let Some(logger) = JsonlExecutionLogger::in_dir(dir)
    {
        debug!("Execution log: {}", logger.path().display());
        executor = executor.with_logger(Arc::new(logger));
    }

    ToolEnv::new(
        executor,
        Arc::new(LocalFileSystem),
        Arc::new(WhichDependencyChecker),
    )
}

fn check(programs: &[String]) -> bool {
    let result = if programs.is_empty() {
        discover_tools(KNOWN_PROGRAMS.iter().copied())
    } else {
        discover_tools(programs.iter().map(String::as_str))
    };

    print!(
        "{}",
        ConsoleFormatter::format_discovery(
            result
                .tools
                .iter()
                .map(|t| (t.program.as_str(), t.path.as_deref()))
        )
    );
    result.all_found()
}

fn read_set(args: &ReadsArgs) -> Result<biorun_domain::ReadSet> {
    args.read_set().map_err(anyhow::Error::msg)
}

/// CLI value first, then the tool's config section
fn resource<'a>(cli_value: &'a Option<PathBuf>, configured: &'a Option<PathBuf>) -> Option<&'a Path> {
    cli_value.as_deref().or(configured.as_deref())
}

fn output_spec(args: &SamtoolsOutputArgs) -> OutputSpec {
    let spec = OutputSpec::new()
        .with_suffix(args.suffix.as_str())
        .delete_input(args.delete_input);
    match &args.out_dir {
        Some(dir) => spec.in_dir(dir),
        None => spec,
    }
}

fn run_samtools(
    command: &SamtoolsCommand,
    env: &ToolEnv,
    config: &FileConfig,
    options: &ExecutionOptions,
    printer: &Printer,
) -> Result<bool> {
    let samtools = Samtools::new(env.clone(), config.tool(samtools::PROGRAM).args)
        .context("Cannot set up samtools")?;

    Ok(match command {
        SamtoolsCommand::SamToBam {
            sam,
            output,
            overrides,
        } => printer.step(
            "samtools view",
            &samtools.sam_to_bam(sam, &output_spec(output), &overrides.to_map(), options),
        ),
        SamtoolsCommand::Sort {
            bam,
            output,
            overrides,
        } => printer.step(
            "samtools sort",
            &samtools.sort_bam(bam, &output_spec(output), &overrides.to_map(), options),
        ),
        SamtoolsCommand::SamSortedBam {
            sam,
            delete_sam,
            output,
            overrides,
        } => printer.step(
            "samtools sam-sorted-bam",
            &samtools.sam_sorted_bam(
                sam,
                *delete_sam,
                &output_spec(output),
                &overrides.to_map(),
                options,
            ),
        ),
        SamtoolsCommand::Merge {
            bams,
            name,
            out_dir,
            delete_inputs,
            overrides,
        } => printer.step(
            "samtools merge",
            &samtools.merge_bam(
                bams,
                name,
                out_dir.as_deref(),
                *delete_inputs,
                &overrides.to_map(),
                options,
            ),
        ),
    })
}

fn run_stringtie(
    command: &StringtieCommand,
    env: &ToolEnv,
    config: &FileConfig,
    options: &ExecutionOptions,
    printer: &Printer,
) -> Result<bool> {
    let section = config.tool(stringtie::PROGRAM);
    let reference_gtf = match command {
        StringtieCommand::Assemble { reference_gtf, .. }
        | StringtieCommand::Merge { reference_gtf, .. } => reference_gtf,
    };
    let stringtie = Stringtie::new(
        env.clone(),
        resource(reference_gtf, &section.reference_gtf),
        section.args,
    )
    .context("Cannot set up stringtie")?;

    Ok(match command {
        StringtieCommand::Assemble {
            bam,
            suffix,
            no_overwrite,
            overrides,
            ..
        } => printer.step(
            "stringtie assemble",
            &stringtie.assemble_with(bam, suffix, !no_overwrite, &overrides.to_map(), options),
        ),
        StringtieCommand::Merge {
            gtfs,
            suffix,
            no_overwrite,
            overrides,
            ..
        } => printer.step(
            "stringtie merge",
            &stringtie.merge(gtfs, suffix, !no_overwrite, &overrides.to_map(), options),
        ),
    })
}

fn run_hisat2(
    command: &Hisat2Command,
    env: &ToolEnv,
    config: &FileConfig,
    options: &ExecutionOptions,
    printer: &Printer,
) -> Result<bool> {
    let section = config.tool(hisat2::PROGRAM);

    Ok(match command {
        Hisat2Command::BuildIndex {
            dir,
            name,
            references,
            overrides,
        } => {
            env.require(&[hisat2::BUILD_PROGRAM])
                .context("Cannot set up hisat2")?;
            let mut aligner = Hisat2::new(env.clone(), section.index.as_deref(), section.args)
                .context("Cannot set up hisat2")?;
            printer.step(
                "hisat2 build-index",
                &aligner.build_index(dir, name, references, &overrides.to_map(), options),
            )
        }
        Hisat2Command::Align {
            reads,
            index,
            suffix,
            overrides,
        } => {
            let aligner = Hisat2::new(
                env.clone(),
                resource(index, &section.index),
                section.args,
            )
            .context("Cannot set up hisat2")?;
            let reads = read_set(reads)?;
            printer.step(
                "hisat2 align",
                &aligner.align_with_suffix(&reads, suffix, &overrides.to_map(), options),
            )
        }
    })
}

fn run_kallisto(
    command: &KallistoCommand,
    env: &ToolEnv,
    config: &FileConfig,
    options: &ExecutionOptions,
    printer: &Printer,
) -> Result<bool> {
    let section = config.tool(kallisto::PROGRAM);

    Ok(match command {
        KallistoCommand::Index {
            dir,
            name,
            fasta,
            overrides,
        } => {
            let mut quantifier = Kallisto::new(env.clone(), section.index.as_deref(), section.args)
                .context("Cannot set up kallisto")?;
            printer.step(
                "kallisto index",
                &quantifier.build_index(dir, name, fasta, &overrides.to_map(), options),
            )
        }
        KallistoCommand::Quant {
            reads,
            index,
            out_dir,
            overrides,
        } => {
            let quantifier = Kallisto::new(
                env.clone(),
                resource(index, &section.index),
                section.args,
            )
            .context("Cannot set up kallisto")?;
            let reads = read_set(reads)?;
            printer.step(
                "kallisto quant",
                &quantifier.quant(&reads, out_dir.as_deref(), &overrides.to_map(), options),
            )
        }
    })
}

fn run_salmon(
    command: &SalmonCommand,
    env: &ToolEnv,
    config: &FileConfig,
    options: &ExecutionOptions,
    printer: &Printer,
) -> Result<bool> {
    let section = config.tool(salmon::PROGRAM);

    Ok(match command {
        SalmonCommand::Index {
            dir,
            name,
            fasta,
            overrides,
        } => {
            let mut quantifier = Salmon::new(env.clone(), section.index.as_deref(), section.args)
                .context("Cannot set up salmon")?;
            printer.step(
                "salmon index",
                &quantifier.build_index(dir, name, fasta, &overrides.to_map(), options),
            )
        }
        SalmonCommand::Quant {
            reads,
            index,
            out_dir,
            overrides,
        } => {
            let quantifier = Salmon::new(
                env.clone(),
                resource(index, &section.index),
                section.args,
            )
            .context("Cannot set up salmon")?;
            let reads = read_set(reads)?;
            printer.step(
                "salmon quant",
                &quantifier.quant(&reads, out_dir.as_deref(), &overrides.to_map(), options),
            )
        }
    })
}

fn run_cufflinks(
    command: &CufflinksCommand,
    env: &ToolEnv,
    config: &FileConfig,
    options: &ExecutionOptions,
    printer: &Printer,
) -> Result<bool> {
    let section = config.tool(cufflinks::PROGRAM);

    Ok(match command {
        CufflinksCommand::Assemble {
            bam,
            reference_gtf,
            suffix,
            no_overwrite,
            overrides,
        } => {
            let suite = Cufflinks::new(
                env.clone(),
                resource(reference_gtf, &section.reference_gtf),
                section.args,
            )
            .context("Cannot set up cufflinks")?;
            printer.step(
                "cufflinks assemble",
                &suite.assemble_with(bam, suffix, !no_overwrite, &overrides.to_map(), options),
            )
        }
        CufflinksCommand::Exec {
            program,
            overrides,
            args,
        } => {
            let suite = Cufflinks::new(
                env.clone(),
                section.reference_gtf.as_deref(),
                section.args,
            )
            .context("Cannot set up cufflinks")?;
            env.require(&[program.as_str()])
                .with_context(|| format!("Cannot run {}", program))?;
            printer.step(
                program,
                &suite.run_cuff_command(program, &with_positional(overrides, args), options),
            )
        }
    })
}

/// Prints reports in the selected format and returns their success
struct Printer {
    format: OutputFormat,
}

impl Printer {
    fn step<T: StepOutput>(&self, operation: &str, result: &StepResult<T>) -> bool {
        self.print(&StepReport::from_result(operation, result))
    }

    fn status(&self, operation: &str, success: bool) -> bool {
        self.print(&StepReport::from_status(operation, success))
    }

    fn print(&self, report: &StepReport) -> bool {
        match self.format {
            OutputFormat::Text => print!("{}", ConsoleFormatter::format(report)),
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(report)),
        }
        report.success
    }
}
