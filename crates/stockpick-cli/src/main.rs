mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use stockpick_core::StockpickConfig;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::Report;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Diagnostics go to stderr so stdout stays a single JSON document.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StockpickConfig::load(path)?,
        None => StockpickConfig::default(),
    };

    let result = commands::run(&cli, &config).await?;
    output::render(&Report::new(commands::name(&cli.command), &result), cli.pretty)?;

    if !result.rejections.is_empty() {
        return Err(CliError::GuardrailRejected {
            violations: result.rejections.join("; "),
        });
    }

    if cli.strict && !result.warnings.is_empty() {
        return Err(CliError::StrictModeViolation {
            warning_count: result.warnings.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}
