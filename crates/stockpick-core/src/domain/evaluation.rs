use serde::{Deserialize, Serialize};

use crate::assembler::{assemble, AssemblyError, EvaluationDraft};
use crate::{
    Catalysts, Decision, Fundamentals, IsoDate, MacroSector, PersonalFit, Technicals, Ticker,
};

/// Full assessment of one ticker for one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvaluationDraft")]
pub struct StockEvaluation {
    pub(crate) ticker: Ticker,
    pub(crate) as_of: IsoDate,
    pub(crate) fundamentals: Fundamentals,
    pub(crate) catalysts: Catalysts,
    pub(crate) technicals: Technicals,
    pub(crate) macro_sector: MacroSector,
    pub(crate) personal_fit: PersonalFit,
    pub(crate) decision: Decision,
    pub(crate) quick_summary: Option<String>,
}

impl StockEvaluation {
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn as_of(&self) -> IsoDate {
        self.as_of
    }

    pub fn fundamentals(&self) -> &Fundamentals {
        &self.fundamentals
    }

    pub fn catalysts(&self) -> &Catalysts {
        &self.catalysts
    }

    pub fn technicals(&self) -> &Technicals {
        &self.technicals
    }

    pub fn macro_sector(&self) -> &MacroSector {
        &self.macro_sector
    }

    pub fn personal_fit(&self) -> &PersonalFit {
        &self.personal_fit
    }

    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    pub fn quick_summary(&self) -> Option<&str> {
        self.quick_summary.as_deref()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

impl TryFrom<EvaluationDraft> for StockEvaluation {
    type Error = AssemblyError;

    fn try_from(value: EvaluationDraft) -> Result<Self, Self::Error> {
        assemble(value)
    }
}
