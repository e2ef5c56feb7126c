mod evaluate;
mod normalize;
mod order;
mod picks;
mod review;
mod size;

use std::path::Path;

use serde_json::Value;
use stockpick_core::StockpickConfig;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    /// Guardrail violations that reject the command's order.
    pub rejections: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            rejections: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_rejections(mut self, rejections: Vec<String>) -> Self {
        self.rejections.extend(rejections);
        self
    }
}

pub const fn name(command: &Command) -> &'static str {
    match command {
        Command::Normalize(_) => "normalize",
        Command::Size(_) => "size",
        Command::Order(_) => "order",
        Command::Picks(_) => "picks",
        Command::Evaluate(_) => "evaluate",
        Command::Review(_) => "review",
    }
}

pub async fn run(cli: &Cli, config: &StockpickConfig) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Normalize(args) => normalize::run(args).await,
        Command::Size(args) => size::run(args, config),
        Command::Order(args) => order::run(args, config).await,
        Command::Picks(args) => picks::run(args).await,
        Command::Evaluate(args) => evaluate::run(args).await,
        Command::Review(args) => review::run(args).await,
    }
}

pub(crate) async fn read_input(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
}
