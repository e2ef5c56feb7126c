use serde::Serialize;

use stockpick_core::{shares_for_target, StockpickConfig};

use crate::cli::SizeArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SizeResponseData {
    portfolio_value: f64,
    price: f64,
    target_pct: f64,
    shares: u64,
}

pub fn run(args: &SizeArgs, config: &StockpickConfig) -> Result<CommandResult, CliError> {
    let target_pct = args
        .target_pct
        .unwrap_or(config.sizing.default_target_pct);
    let shares = shares_for_target(args.portfolio_value, args.price, target_pct)?;

    let data = serde_json::to_value(SizeResponseData {
        portfolio_value: args.portfolio_value,
        price: args.price,
        target_pct,
        shares,
    })?;
    Ok(CommandResult::ok(data))
}
