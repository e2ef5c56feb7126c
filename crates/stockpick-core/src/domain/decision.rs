use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::bounds::{check_int_range, Bound};
use crate::{ValidationError, ValidationErrors, Violations};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
    /// Not now; keep monitoring.
    #[default]
    Watch,
}

impl Recommendation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Sell => "sell",
            Self::Watch => "watch",
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const MIN_CONVICTION: i64 = 1;
pub(crate) const MAX_CONVICTION: i64 = 5;
const DEFAULT_CONVICTION: u8 = 3;

/// Trade decision with price levels.
///
/// When both are present, `stop_price < entry_price` and
/// `target_price > entry_price`; violations fail construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DecisionBuilder")]
pub struct Decision {
    recommendation: Recommendation,
    entry_price: Option<f64>,
    add_levels: Vec<f64>,
    target_price: Option<f64>,
    stop_price: Option<f64>,
    conviction_1to5: u8,
    notes: Option<String>,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            recommendation: Recommendation::default(),
            entry_price: None,
            add_levels: Vec::new(),
            target_price: None,
            stop_price: None,
            conviction_1to5: DEFAULT_CONVICTION,
            notes: None,
        }
    }
}

impl Decision {
    pub fn builder() -> DecisionBuilder {
        DecisionBuilder::default()
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.entry_price
    }

    pub fn add_levels(&self) -> &[f64] {
        &self.add_levels
    }

    pub fn target_price(&self) -> Option<f64> {
        self.target_price
    }

    pub fn stop_price(&self) -> Option<f64> {
        self.stop_price
    }

    pub fn conviction(&self) -> u8 {
        self.conviction_1to5
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecisionBuilder {
    pub recommendation: Recommendation,
    pub entry_price: Option<f64>,
    pub add_levels: Vec<f64>,
    pub target_price: Option<f64>,
    pub stop_price: Option<f64>,
    pub conviction_1to5: i64,
    pub notes: Option<String>,
}

impl Default for DecisionBuilder {
    fn default() -> Self {
        Decision::default().into()
    }
}

impl DecisionBuilder {
    pub fn recommendation(mut self, value: Recommendation) -> Self {
        self.recommendation = value;
        self
    }

    pub fn entry_price(mut self, value: f64) -> Self {
        self.entry_price = Some(value);
        self
    }

    pub fn target_price(mut self, value: f64) -> Self {
        self.target_price = Some(value);
        self
    }

    pub fn stop_price(mut self, value: f64) -> Self {
        self.stop_price = Some(value);
        self
    }

    pub fn add_level(mut self, value: f64) -> Self {
        self.add_levels.push(value);
        self
    }

    pub fn conviction(mut self, value: i64) -> Self {
        self.conviction_1to5 = value;
        self
    }

    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());
        self
    }

    pub fn build(self) -> Result<Decision, ValidationErrors> {
        let mut violations = Violations::default();
        violations.check(Bound::NON_NEGATIVE.check_optional("entry_price", self.entry_price));
        violations.check(Bound::NON_NEGATIVE.check_optional("target_price", self.target_price));
        violations.check(Bound::NON_NEGATIVE.check_optional("stop_price", self.stop_price));
        for level in &self.add_levels {
            violations.check(Bound::NON_NEGATIVE.check("add_levels", *level));
        }
        violations.check(check_int_range(
            "conviction_1to5",
            self.conviction_1to5,
            MIN_CONVICTION,
            MAX_CONVICTION,
        ));

        if let Some(entry) = self.entry_price {
            if let Some(stop) = self.stop_price {
                if stop >= entry {
                    violations.push(ValidationError::StopNotBelowEntry { stop, entry });
                }
            }
            if let Some(target) = self.target_price {
                if target <= entry {
                    violations.push(ValidationError::TargetNotAboveEntry { target, entry });
                }
            }
        }
        violations.finish()?;

        Ok(Decision {
            recommendation: self.recommendation,
            entry_price: self.entry_price,
            add_levels: self.add_levels,
            target_price: self.target_price,
            stop_price: self.stop_price,
            conviction_1to5: u8::try_from(self.conviction_1to5).unwrap_or(DEFAULT_CONVICTION),
            notes: self.notes,
        })
    }
}

impl From<Decision> for DecisionBuilder {
    fn from(value: Decision) -> Self {
        Self {
            recommendation: value.recommendation,
            entry_price: value.entry_price,
            add_levels: value.add_levels,
            target_price: value.target_price,
            stop_price: value.stop_price,
            conviction_1to5: i64::from(value.conviction_1to5),
            notes: value.notes,
        }
    }
}

impl TryFrom<DecisionBuilder> for Decision {
    type Error = ValidationErrors;

    fn try_from(value: DecisionBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}
