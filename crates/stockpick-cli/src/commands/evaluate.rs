use stockpick_core::{assemble, normalize_from, EvaluationDraft, JsonPayloadProvider, Ticker};

use crate::cli::EvaluateArgs;
use crate::error::CliError;

use super::{read_input, CommandResult};

pub async fn run(args: &EvaluateArgs) -> Result<CommandResult, CliError> {
    let mut draft: EvaluationDraft = serde_json::from_str(&read_input(&args.path).await?)?;

    if let Some(path) = &args.payload {
        let ticker = Ticker::parse(&draft.ticker)?;
        let provider = JsonPayloadProvider::from_read(
            path.display().to_string(),
            tokio::fs::read_to_string(path).await,
        );
        draft = draft.fundamentals(normalize_from(&provider, &ticker));
    }

    let evaluation = assemble(draft)?;
    let warnings = evaluation
        .fundamentals()
        .warnings()
        .iter()
        .map(|warning| format!("{}: {warning}", evaluation.ticker()))
        .collect();
    let data = serde_json::to_value(&evaluation)?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
