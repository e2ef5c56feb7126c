//! Assessment assembler.
//!
//! Composes the per-section drafts into a [`StockEvaluation`]. Each section is
//! validated by its own builder, in a fixed order; the first section that
//! fails aborts assembly and is reported with its full list of violations.
//! Sections left unset take their empty form.

use std::fmt::{Display, Formatter};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    CatalystsBuilder, DecisionBuilder, FundamentalsBuilder, IsoDate, MacroSectorBuilder,
    PersonalFitBuilder, StockEvaluation, TechnicalsBuilder, Ticker, ValidationErrors,
};

/// Section of a [`StockEvaluation`], in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Ticker,
    Fundamentals,
    Catalysts,
    Technicals,
    MacroSector,
    PersonalFit,
    Decision,
}

impl Section {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Fundamentals => "fundamentals",
            Self::Catalysts => "catalysts",
            Self::Technicals => "technicals",
            Self::MacroSector => "macro_sector",
            Self::PersonalFit => "personal_fit",
            Self::Decision => "decision",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{section} failed validation: {errors}")]
pub struct AssemblyError {
    pub section: Section,
    pub errors: ValidationErrors,
}

/// Unvalidated inputs for one evaluation. Also the parse form of a
/// serialized [`StockEvaluation`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationDraft {
    pub ticker: String,
    #[serde(default = "IsoDate::today")]
    pub as_of: IsoDate,
    #[serde(default)]
    pub fundamentals: Option<FundamentalsBuilder>,
    #[serde(default)]
    pub catalysts: Option<CatalystsBuilder>,
    #[serde(default)]
    pub technicals: Option<TechnicalsBuilder>,
    #[serde(default)]
    pub macro_sector: Option<MacroSectorBuilder>,
    #[serde(default)]
    pub personal_fit: Option<PersonalFitBuilder>,
    #[serde(default)]
    pub decision: Option<DecisionBuilder>,
    #[serde(default)]
    pub quick_summary: Option<String>,
}

impl EvaluationDraft {
    pub fn new(ticker: impl Into<String>, as_of: IsoDate) -> Self {
        Self {
            ticker: ticker.into(),
            as_of,
            fundamentals: None,
            catalysts: None,
            technicals: None,
            macro_sector: None,
            personal_fit: None,
            decision: None,
            quick_summary: None,
        }
    }

    pub fn fundamentals(mut self, section: impl Into<FundamentalsBuilder>) -> Self {
        self.fundamentals = Some(section.into());
        self
    }

    pub fn catalysts(mut self, section: impl Into<CatalystsBuilder>) -> Self {
        self.catalysts = Some(section.into());
        self
    }

    pub fn technicals(mut self, section: impl Into<TechnicalsBuilder>) -> Self {
        self.technicals = Some(section.into());
        self
    }

    pub fn macro_sector(mut self, section: impl Into<MacroSectorBuilder>) -> Self {
        self.macro_sector = Some(section.into());
        self
    }

    pub fn personal_fit(mut self, section: impl Into<PersonalFitBuilder>) -> Self {
        self.personal_fit = Some(section.into());
        self
    }

    pub fn decision(mut self, section: impl Into<DecisionBuilder>) -> Self {
        self.decision = Some(section.into());
        self
    }

    pub fn quick_summary(mut self, summary: impl Into<String>) -> Self {
        self.quick_summary = Some(summary.into());
        self
    }
}

fn build_section<B, T>(
    section: Section,
    draft: Option<B>,
    build: impl FnOnce(B) -> Result<T, ValidationErrors>,
) -> Result<T, AssemblyError>
where
    T: Default,
{
    match draft {
        Some(draft) => build(draft).map_err(|errors| AssemblyError { section, errors }),
        None => Ok(T::default()),
    }
}

/// Validate every section and compose the evaluation.
pub fn assemble(draft: EvaluationDraft) -> Result<StockEvaluation, AssemblyError> {
    let ticker = Ticker::parse(&draft.ticker).map_err(|error| AssemblyError {
        section: Section::Ticker,
        errors: error.into(),
    })?;

    let fundamentals = build_section(
        Section::Fundamentals,
        draft.fundamentals,
        FundamentalsBuilder::build,
    )?;
    let catalysts = build_section(Section::Catalysts, draft.catalysts, CatalystsBuilder::build)?;
    let technicals = build_section(Section::Technicals, draft.technicals, TechnicalsBuilder::build)?;
    let macro_sector = build_section(
        Section::MacroSector,
        draft.macro_sector,
        MacroSectorBuilder::build,
    )?;
    let personal_fit = build_section(
        Section::PersonalFit,
        draft.personal_fit,
        PersonalFitBuilder::build,
    )?;
    let decision = build_section(Section::Decision, draft.decision, DecisionBuilder::build)?;

    tracing::debug!(ticker = %ticker, as_of = %draft.as_of, "assembled stock evaluation");

    Ok(StockEvaluation {
        ticker,
        as_of: draft.as_of,
        fundamentals,
        catalysts,
        technicals,
        macro_sector,
        personal_fit,
        decision,
        quick_summary: draft.quick_summary,
    })
}
