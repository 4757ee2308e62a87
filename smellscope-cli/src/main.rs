//! smellscope CLI -- command-line interface for code smell detection
//!
//! # Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! | 0    | Success                 |
//! | 1    | General / command error |
//! | 2    | Configuration error     |
//! | 3    | No cached results       |
//! | 10   | IO error                |

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use smellscope_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let log_level = cli.log_level.as_deref();

    // config 명령은 설정 파일이 깨져 있어도 결과를 보고해야 함
    if let Commands::Config(args) = cli.command {
        let general = GeneralConfig {
            log_level: log_level.unwrap_or("warn").to_owned(),
            ..GeneralConfig::default()
        };
        init_logging(&general)?;
        return commands::config::execute(args, &cli.config, log_level, &writer).await;
    }

    let config = commands::config::load_effective(&cli.config, log_level).await?;
    init_logging(&config.general)?;
    smellscope_core::metrics::describe_all();

    tracing::debug!(
        config = %cli.config.display(),
        model = %config.paths.model.display(),
        detectors = %config.paths.detectors.display(),
        cache = %config.paths.cache.display(),
        "smellscope starting"
    );

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &config, &writer).await,
        Commands::Show(args) => commands::show::execute(args, &config, &writer).await,
        Commands::Stats => commands::stats::execute(&config, &writer).await,
        Commands::Detectors => commands::detectors::execute(&config, &writer).await,
        Commands::Config(_) => Ok(()),
    }
}

fn init_logging(config: &GeneralConfig) -> Result<(), CliError> {
    logging::init_tracing(config).map_err(|e| CliError::Config(e.to_string()))
}
