use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::domain::bounds::Bound;
use crate::{ValidationError, ValidationErrors, Violations};

/// Non-fatal data-quality issue; stored on [`Fundamentals`] as its display string.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataQualityWarning {
    #[error(
        "insufficient quarterly history for {metric}: need {needed} quarters, have {available}"
    )]
    InsufficientHistory {
        metric: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("insufficient quarterly history for {metric}: base-period revenue is zero or missing")]
    ZeroBase { metric: &'static str },
    #[error("incomplete quarterly revenue for {metric}: {missing} of {window} quarters missing or zero")]
    IncompleteRevenue {
        metric: &'static str,
        missing: usize,
        window: usize,
    },
    #[error("operating margin out of bounds: {value:.2}%")]
    OperatingMarginOutOfBounds { value: f64 },
    #[error("{field} out of bounds: {value}; value dropped")]
    OutOfBounds { field: &'static str, value: f64 },
    #[error("{field} is not a finite number; value dropped")]
    NonFinite { field: &'static str },
    #[error("failed to fetch fundamentals from {provider}: {message}")]
    ProviderFailure { provider: String, message: String },
}

/// Canonical fundamentals snapshot. Monetary scale fields are in millions of USD.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "FundamentalsBuilder")]
pub struct Fundamentals {
    revenue_yoy_pct_q: Option<f64>,
    revenue_yoy_pct_ttm: Option<f64>,
    revenue_ttm_musd: Option<f64>,
    operating_margin_pct: Option<f64>,
    pe_ttm: Option<f64>,
    ps_ttm: Option<f64>,
    cash_reserves_musd: Option<f64>,
    total_debt_musd: Option<f64>,
    market_cap_musd: Option<f64>,
    warnings: Vec<String>,
}

impl Fundamentals {
    pub fn builder() -> FundamentalsBuilder {
        FundamentalsBuilder::default()
    }

    /// Record carrying nothing but warnings, used when every source failed.
    pub fn warnings_only(warnings: impl IntoIterator<Item = DataQualityWarning>) -> Self {
        Self {
            warnings: warnings.into_iter().map(|w| w.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn revenue_yoy_pct_q(&self) -> Option<f64> {
        self.revenue_yoy_pct_q
    }

    pub fn revenue_yoy_pct_ttm(&self) -> Option<f64> {
        self.revenue_yoy_pct_ttm
    }

    pub fn revenue_ttm_musd(&self) -> Option<f64> {
        self.revenue_ttm_musd
    }

    pub fn operating_margin_pct(&self) -> Option<f64> {
        self.operating_margin_pct
    }

    pub fn pe_ttm(&self) -> Option<f64> {
        self.pe_ttm
    }

    pub fn ps_ttm(&self) -> Option<f64> {
        self.ps_ttm
    }

    pub fn cash_reserves_musd(&self) -> Option<f64> {
        self.cash_reserves_musd
    }

    pub fn total_debt_musd(&self) -> Option<f64> {
        self.total_debt_musd
    }

    pub fn market_cap_musd(&self) -> Option<f64> {
        self.market_cap_musd
    }

    /// `total_debt - cash`, only when both are known. Never defaults to zero.
    pub fn net_debt_musd(&self) -> Option<f64> {
        match (self.total_debt_musd, self.cash_reserves_musd) {
            (Some(debt), Some(cash)) => Some(debt - cash),
            _ => None,
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// True when no numeric field is populated.
    pub fn is_empty(&self) -> bool {
        FundamentalsBuilder::from(self.clone())
            .fields()
            .iter()
            .all(|(_, _, value)| value.is_none())
    }
}

impl Serialize for Fundamentals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Fundamentals", 11)?;
        state.serialize_field("revenue_yoy_pct_q", &self.revenue_yoy_pct_q)?;
        state.serialize_field("revenue_yoy_pct_ttm", &self.revenue_yoy_pct_ttm)?;
        state.serialize_field("revenue_ttm_musd", &self.revenue_ttm_musd)?;
        state.serialize_field("operating_margin_pct", &self.operating_margin_pct)?;
        state.serialize_field("pe_ttm", &self.pe_ttm)?;
        state.serialize_field("ps_ttm", &self.ps_ttm)?;
        state.serialize_field("cash_reserves_musd", &self.cash_reserves_musd)?;
        state.serialize_field("total_debt_musd", &self.total_debt_musd)?;
        state.serialize_field("net_debt_musd", &self.net_debt_musd())?;
        state.serialize_field("market_cap_musd", &self.market_cap_musd)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}

/// Draft of a [`Fundamentals`] record. `net_debt_musd` in input is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FundamentalsBuilder {
    revenue_yoy_pct_q: Option<f64>,
    revenue_yoy_pct_ttm: Option<f64>,
    revenue_ttm_musd: Option<f64>,
    operating_margin_pct: Option<f64>,
    pe_ttm: Option<f64>,
    ps_ttm: Option<f64>,
    cash_reserves_musd: Option<f64>,
    total_debt_musd: Option<f64>,
    market_cap_musd: Option<f64>,
    warnings: Vec<String>,
}

impl FundamentalsBuilder {
    pub fn revenue_yoy_pct_q(mut self, value: impl Into<Option<f64>>) -> Self {
        self.revenue_yoy_pct_q = value.into();
        self
    }

    pub fn revenue_yoy_pct_ttm(mut self, value: impl Into<Option<f64>>) -> Self {
        self.revenue_yoy_pct_ttm = value.into();
        self
    }

    pub fn revenue_ttm_musd(mut self, value: impl Into<Option<f64>>) -> Self {
        self.revenue_ttm_musd = value.into();
        self
    }

    pub fn operating_margin_pct(mut self, value: impl Into<Option<f64>>) -> Self {
        self.operating_margin_pct = value.into();
        self
    }

    pub fn pe_ttm(mut self, value: impl Into<Option<f64>>) -> Self {
        self.pe_ttm = value.into();
        self
    }

    pub fn ps_ttm(mut self, value: impl Into<Option<f64>>) -> Self {
        self.ps_ttm = value.into();
        self
    }

    pub fn cash_reserves_musd(mut self, value: impl Into<Option<f64>>) -> Self {
        self.cash_reserves_musd = value.into();
        self
    }

    pub fn total_debt_musd(mut self, value: impl Into<Option<f64>>) -> Self {
        self.total_debt_musd = value.into();
        self
    }

    pub fn market_cap_musd(mut self, value: impl Into<Option<f64>>) -> Self {
        self.market_cap_musd = value.into();
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn warnings<I, W>(mut self, warnings: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.warnings.extend(warnings.into_iter().map(Into::into));
        self
    }

    fn fields(&self) -> [(&'static str, Bound, Option<f64>); 9] {
        [
            ("revenue_yoy_pct_q", Bound::GROWTH_PCT, self.revenue_yoy_pct_q),
            ("revenue_yoy_pct_ttm", Bound::GROWTH_PCT, self.revenue_yoy_pct_ttm),
            ("revenue_ttm_musd", Bound::NON_NEGATIVE, self.revenue_ttm_musd),
            ("operating_margin_pct", Bound::MARGIN_PCT, self.operating_margin_pct),
            ("pe_ttm", Bound::NON_NEGATIVE, self.pe_ttm),
            ("ps_ttm", Bound::NON_NEGATIVE, self.ps_ttm),
            ("cash_reserves_musd", Bound::NON_NEGATIVE, self.cash_reserves_musd),
            ("total_debt_musd", Bound::NON_NEGATIVE, self.total_debt_musd),
            ("market_cap_musd", Bound::NON_NEGATIVE, self.market_cap_musd),
        ]
    }

    fn fields_mut(&mut self) -> [(&'static str, Bound, &mut Option<f64>); 9] {
        [
            ("revenue_yoy_pct_q", Bound::GROWTH_PCT, &mut self.revenue_yoy_pct_q),
            ("revenue_yoy_pct_ttm", Bound::GROWTH_PCT, &mut self.revenue_yoy_pct_ttm),
            ("revenue_ttm_musd", Bound::NON_NEGATIVE, &mut self.revenue_ttm_musd),
            ("operating_margin_pct", Bound::MARGIN_PCT, &mut self.operating_margin_pct),
            ("pe_ttm", Bound::NON_NEGATIVE, &mut self.pe_ttm),
            ("ps_ttm", Bound::NON_NEGATIVE, &mut self.ps_ttm),
            ("cash_reserves_musd", Bound::NON_NEGATIVE, &mut self.cash_reserves_musd),
            ("total_debt_musd", Bound::NON_NEGATIVE, &mut self.total_debt_musd),
            ("market_cap_musd", Bound::NON_NEGATIVE, &mut self.market_cap_musd),
        ]
    }

    /// Strict build: any out-of-bounds field is a validation failure.
    pub fn build(self) -> Result<Fundamentals, ValidationErrors> {
        let mut violations = Violations::default();
        for (field, bound, value) in self.fields() {
            violations.check(bound.check_optional(field, value));
        }
        violations.finish()?;
        Ok(self.into_record())
    }

    /// Lenient build used by the normalizer: out-of-bounds fields are nulled
    /// and a warning is appended for each, in field order.
    pub fn build_lenient(mut self) -> Fundamentals {
        let mut dropped = Vec::new();
        for (field, bound, slot) in self.fields_mut() {
            let Some(value) = *slot else { continue };
            match bound.check(field, value) {
                Ok(()) => {}
                Err(ValidationError::NonFiniteValue { .. }) => {
                    dropped.push(DataQualityWarning::NonFinite { field });
                    *slot = None;
                }
                Err(_) => {
                    dropped.push(DataQualityWarning::OutOfBounds { field, value });
                    *slot = None;
                }
            }
        }
        if !dropped.is_empty() {
            tracing::warn!(count = dropped.len(), "dropped out-of-bounds fundamentals fields");
        }
        self.warnings
            .extend(dropped.into_iter().map(|warning| warning.to_string()));
        self.into_record()
    }

    fn into_record(self) -> Fundamentals {
        Fundamentals {
            revenue_yoy_pct_q: self.revenue_yoy_pct_q,
            revenue_yoy_pct_ttm: self.revenue_yoy_pct_ttm,
            revenue_ttm_musd: self.revenue_ttm_musd,
            operating_margin_pct: self.operating_margin_pct,
            pe_ttm: self.pe_ttm,
            ps_ttm: self.ps_ttm,
            cash_reserves_musd: self.cash_reserves_musd,
            total_debt_musd: self.total_debt_musd,
            market_cap_musd: self.market_cap_musd,
            warnings: self.warnings,
        }
    }
}

impl From<Fundamentals> for FundamentalsBuilder {
    fn from(value: Fundamentals) -> Self {
        Self {
            revenue_yoy_pct_q: value.revenue_yoy_pct_q,
            revenue_yoy_pct_ttm: value.revenue_yoy_pct_ttm,
            revenue_ttm_musd: value.revenue_ttm_musd,
            operating_margin_pct: value.operating_margin_pct,
            pe_ttm: value.pe_ttm,
            ps_ttm: value.ps_ttm,
            cash_reserves_musd: value.cash_reserves_musd,
            total_debt_musd: value.total_debt_musd,
            market_cap_musd: value.market_cap_musd,
            warnings: value.warnings,
        }
    }
}

impl TryFrom<FundamentalsBuilder> for Fundamentals {
    type Error = ValidationErrors;

    fn try_from(value: FundamentalsBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}
