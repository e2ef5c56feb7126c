use std::collections::HashMap;

use serde::Serialize;

use stockpick_core::{daily_review, BrokerPosition, MarketSnapshot, ReviewEntry};

use crate::cli::ReviewArgs;
use crate::error::CliError;

use super::{read_input, CommandResult};

#[derive(Debug, Serialize)]
struct ReviewResponseData {
    review: Vec<ReviewEntry>,
}

pub async fn run(args: &ReviewArgs) -> Result<CommandResult, CliError> {
    let positions = BrokerPosition::parse_list(&read_input(&args.positions).await?)?;
    let snapshots: HashMap<String, MarketSnapshot> = match &args.snapshots {
        Some(path) => serde_json::from_str(&read_input(path).await?)?,
        None => HashMap::new(),
    };

    let review = daily_review(&positions, &snapshots);
    let warnings = review
        .iter()
        .filter(|entry| entry.facts.market_price.is_none())
        .map(|entry| format!("{}: no market price", entry.facts.symbol))
        .collect();

    let data = serde_json::to_value(ReviewResponseData { review })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
