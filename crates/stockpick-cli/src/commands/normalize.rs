use serde::Serialize;

use stockpick_core::{normalize_from, Fundamentals, JsonPayloadProvider, Ticker};

use crate::cli::NormalizeArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct NormalizedTicker {
    ticker: Ticker,
    source: String,
    fundamentals: Fundamentals,
}

#[derive(Debug, Serialize)]
struct NormalizeResponseData {
    results: Vec<NormalizedTicker>,
}

/// Payloads are normalized on the blocking pool; results keep argument order.
/// A payload file that cannot be read only affects its own ticker.
pub async fn run(args: &NormalizeArgs) -> Result<CommandResult, CliError> {
    let mut tasks = Vec::with_capacity(args.payloads.len());
    for spec in &args.payloads {
        let ticker = Ticker::parse(&spec.ticker)?;
        let source = spec.path.display().to_string();
        let provider = JsonPayloadProvider::from_read(
            source.clone(),
            tokio::fs::read_to_string(&spec.path).await,
        );
        tasks.push(tokio::task::spawn_blocking(move || {
            let fundamentals = normalize_from(&provider, &ticker);
            NormalizedTicker {
                ticker,
                source,
                fundamentals,
            }
        }));
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut warnings = Vec::new();
    for task in tasks {
        let normalized = task
            .await
            .map_err(|error| CliError::Command(format!("normalization task failed: {error}")))?;
        warnings.extend(
            normalized
                .fundamentals
                .warnings()
                .iter()
                .map(|warning| format!("{}: {warning}", normalized.ticker)),
        );
        results.push(normalized);
    }

    let data = serde_json::to_value(NormalizeResponseData { results })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
