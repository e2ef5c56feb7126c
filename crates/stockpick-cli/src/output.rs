use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::commands::CommandResult;
use crate::error::CliError;

/// Stdout document for every command.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub command: &'static str,
    pub data: &'a Value,
    pub warnings: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub rejections: &'a [String],
}

impl<'a> Report<'a> {
    pub fn new(command: &'static str, result: &'a CommandResult) -> Self {
        Self {
            command,
            data: &result.data,
            warnings: &result.warnings,
            rejections: &result.rejections,
        }
    }
}

pub fn to_json(report: &Report<'_>, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(payload)
}

pub fn render(report: &Report<'_>, pretty: bool) -> Result<(), CliError> {
    let payload = to_json(report, pretty)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{payload}")?;
    Ok(())
}
