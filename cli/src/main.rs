//! CLI entrypoint for biorun
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod dispatch;

use biorun_infrastructure::{ConfigLoader, FileConfig};
use biorun_presentation::{Cli, Command};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix of the daily-rolling tracing log
const TRACE_LOG_PREFIX: &str = "biorun.log";

/// Exit status for configuration and usage errors
const EXIT_CONFIG_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Config = cli.command {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let _guard = init_tracing(cli.verbose, config.execution.log_dir.as_deref());
    info!("Starting biorun");

    for warning in config.validate() {
        warn!("Config: {}", warning);
    }

    match dispatch::run(&cli, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig, biorun_infrastructure::ConfigError> {
    if cli.no_config {
        Ok(ConfigLoader::load_defaults())
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
}

/// Console logging by `-v` count (RUST_LOG wins when set), plus a
/// daily-rolling file in `log_dir` when configured.
fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, TRACE_LOG_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}
