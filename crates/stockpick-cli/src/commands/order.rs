use serde::Serialize;

use stockpick_core::{
    size_order, BrokerPosition, GuardrailSet, GuardrailVerdict, OrderRequest, Pick, Picks,
    Portfolio, PositionExposure, ProposedOrder, StockpickConfig, Ticker,
};

use crate::cli::OrderArgs;
use crate::error::CliError;

use super::{read_input, CommandResult};

#[derive(Debug, Serialize)]
struct OrderResponseData {
    order: ProposedOrder,
    request: OrderRequest,
    exposure: PositionExposure,
    portfolio_value: f64,
    verdict: GuardrailVerdict,
}

fn select_pick<'a>(picks: &'a Picks, ticker: Option<&str>) -> Result<&'a Pick, CliError> {
    let Some(raw) = ticker else {
        return picks
            .iter()
            .next()
            .ok_or_else(|| CliError::Command(String::from("picks file contains no picks")));
    };
    let ticker = Ticker::parse(raw)?;
    picks
        .iter()
        .find(|pick| pick.ticker() == &ticker)
        .ok_or_else(|| CliError::Command(format!("no pick for '{ticker}'")))
}

pub async fn run(args: &OrderArgs, config: &StockpickConfig) -> Result<CommandResult, CliError> {
    let picks = Picks::parse_json(&read_input(&args.picks).await?)?;
    let pick = select_pick(&picks, args.ticker.as_deref())?;

    let rows = match &args.positions {
        Some(path) => BrokerPosition::parse_list(&read_input(path).await?)?,
        None => Vec::new(),
    };
    let portfolio = Portfolio::from_broker(&rows, args.cash)?;

    let target_pct = args
        .target_pct
        .unwrap_or(config.sizing.default_target_pct);
    let order = size_order(pick, args.price, &portfolio, target_pct, &config.orders)?;
    let exposure = PositionExposure::from_portfolio(&portfolio, pick.ticker())
        .with_avg_daily_dollar_volume(args.adv_musd);
    let verdict = GuardrailSet::from_config(&config.guardrails).evaluate(&order, &exposure);
    let rejections = verdict
        .violations()
        .iter()
        .map(ToString::to_string)
        .collect();

    let data = serde_json::to_value(OrderResponseData {
        request: order.to_request(),
        order,
        exposure,
        portfolio_value: portfolio.total_value(),
        verdict,
    })?;
    Ok(CommandResult::ok(data).with_rejections(rejections))
}
