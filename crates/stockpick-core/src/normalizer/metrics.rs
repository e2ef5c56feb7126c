//! Pure field derivations over quarterly statement rows.
//!
//! Rows are expected oldest to newest. Every function returns a [`Derived`]
//! value: the field (or `None`) plus the warnings explaining a `None`.

use crate::domain::Bound;
use crate::normalizer::QuarterlyIncome;
use crate::DataQualityWarning;

pub(crate) const QUARTERS_PER_YEAR: usize = 4;
const YOY_QUARTERLY_WINDOW: usize = QUARTERS_PER_YEAR + 1;
const YOY_TTM_WINDOW: usize = 2 * QUARTERS_PER_YEAR;
const USD_PER_MILLION: f64 = 1_000_000.0;

/// A derived field and the warnings produced while deriving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Derived {
    pub value: Option<f64>,
    pub warnings: Vec<DataQualityWarning>,
}

impl Derived {
    pub fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            warnings: Vec::new(),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    pub fn warn(warning: DataQualityWarning) -> Self {
        Self {
            value: None,
            warnings: vec![warning],
        }
    }

    /// Use `fallback` when nothing was derived. A fallback that yields a
    /// value replaces the primary warnings; otherwise they are kept.
    pub fn or_fallback(self, field: &'static str, source: &'static str, fallback: Option<f64>) -> Self {
        if self.value.is_some() {
            tracing::debug!(field, source = "statements", "derived fundamentals field");
            return self;
        }
        match fallback {
            Some(value) => {
                tracing::debug!(field, source, "fell back to snapshot value");
                Self::value(value)
            }
            None => self,
        }
    }
}

pub(crate) fn to_millions(raw_usd: f64) -> f64 {
    raw_usd / USD_PER_MILLION
}

fn usable_revenue(row: &QuarterlyIncome) -> Option<f64> {
    row.revenue.filter(|value| value.is_finite() && *value != 0.0)
}

/// Sum of the window's revenue, or a warning naming how many quarters were unusable.
fn window_sum(metric: &'static str, window: &[&QuarterlyIncome]) -> Result<f64, DataQualityWarning> {
    let usable: Vec<f64> = window.iter().filter_map(|row| usable_revenue(row)).collect();
    let missing = window.len() - usable.len();
    if missing > 0 {
        return Err(DataQualityWarning::IncompleteRevenue {
            metric,
            missing,
            window: window.len(),
        });
    }
    Ok(usable.iter().sum())
}

fn percent_change(current: f64, base: f64) -> f64 {
    100.0 * (current - base) / base
}

/// Latest quarter against the same quarter one year earlier.
pub(crate) fn revenue_yoy_quarterly(quarters: &[&QuarterlyIncome]) -> Derived {
    const METRIC: &str = "revenue_yoy_pct_q";

    if quarters.len() < YOY_QUARTERLY_WINDOW {
        return Derived::warn(DataQualityWarning::InsufficientHistory {
            metric: METRIC,
            needed: YOY_QUARTERLY_WINDOW,
            available: quarters.len(),
        });
    }

    let latest = quarters[quarters.len() - 1];
    let base = quarters[quarters.len() - YOY_QUARTERLY_WINDOW];
    let Some(base_revenue) = usable_revenue(base) else {
        return Derived::warn(DataQualityWarning::ZeroBase { metric: METRIC });
    };
    match latest.revenue.filter(|value| value.is_finite()) {
        Some(latest_revenue) => Derived::value(percent_change(latest_revenue, base_revenue)),
        None => Derived::warn(DataQualityWarning::IncompleteRevenue {
            metric: METRIC,
            missing: 1,
            window: 2,
        }),
    }
}

/// Trailing four quarters against the four before them. A history shorter
/// than eight quarters leaves the field null without a warning.
pub(crate) fn revenue_yoy_ttm(quarters: &[&QuarterlyIncome]) -> Derived {
    const METRIC: &str = "revenue_yoy_pct_ttm";

    if quarters.len() < YOY_TTM_WINDOW {
        tracing::debug!(
            available = quarters.len(),
            needed = YOY_TTM_WINDOW,
            "not enough quarters for trailing growth"
        );
        return Derived::missing();
    }

    let window = &quarters[quarters.len() - YOY_TTM_WINDOW..];
    if let Err(warning) = window_sum(METRIC, window) {
        return Derived::warn(warning);
    }
    let (previous, current) = window.split_at(QUARTERS_PER_YEAR);
    let previous: f64 = previous.iter().filter_map(|row| row.revenue).sum();
    let current: f64 = current.iter().filter_map(|row| row.revenue).sum();
    if previous == 0.0 {
        return Derived::warn(DataQualityWarning::ZeroBase { metric: METRIC });
    }
    Derived::value(percent_change(current, previous))
}

/// Sum of the last four quarters, in millions.
pub(crate) fn revenue_ttm(quarters: &[&QuarterlyIncome]) -> Derived {
    const METRIC: &str = "revenue_ttm_musd";

    if quarters.len() < QUARTERS_PER_YEAR {
        return Derived::warn(DataQualityWarning::InsufficientHistory {
            metric: METRIC,
            needed: QUARTERS_PER_YEAR,
            available: quarters.len(),
        });
    }

    match window_sum(METRIC, &quarters[quarters.len() - QUARTERS_PER_YEAR..]) {
        Ok(total) => Derived::value(to_millions(total)),
        Err(warning) => Derived::warn(warning),
    }
}

/// Operating margin of the latest quarter, in percent. Silent when the
/// latest row lacks either figure.
pub(crate) fn operating_margin_latest(quarters: &[&QuarterlyIncome]) -> Derived {
    let Some(latest) = quarters.last() else {
        return Derived::missing();
    };
    match (latest.operating_income, usable_revenue(latest)) {
        (Some(income), Some(revenue)) => Derived::value(100.0 * income / revenue),
        _ => Derived::missing(),
    }
}

/// Null a margin that cannot be a real percentage.
pub(crate) fn bound_operating_margin(derived: Derived) -> Derived {
    let Some(value) = derived.value else {
        return derived;
    };
    if !value.is_finite() {
        return Derived::warn(DataQualityWarning::NonFinite {
            field: "operating_margin_pct",
        });
    }
    if Bound::MARGIN_PCT.contains(value) {
        return derived;
    }
    tracing::warn!(value, "operating margin out of bounds");
    Derived::warn(DataQualityWarning::OperatingMarginOutOfBounds { value })
}
