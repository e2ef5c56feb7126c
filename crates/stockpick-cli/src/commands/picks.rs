use serde::Serialize;

use stockpick_core::Picks;

use crate::cli::PicksArgs;
use crate::error::CliError;

use super::{read_input, CommandResult};

#[derive(Debug, Serialize)]
struct PicksResponseData {
    count: usize,
    picks: Picks,
}

pub async fn run(args: &PicksArgs) -> Result<CommandResult, CliError> {
    let picks = Picks::parse_json(&read_input(&args.path).await?)?;
    let data = serde_json::to_value(PicksResponseData {
        count: picks.len(),
        picks,
    })?;
    Ok(CommandResult::ok(data))
}
