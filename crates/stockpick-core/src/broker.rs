//! Broker and market-data boundary records.
//!
//! The broker reports numeric fields as JSON strings (`"qty": "12"`), the
//! market-data feed as plain numbers. Both are accepted wherever a number is
//! expected.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Portfolio, Position, ValidationErrors, Violations};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid number '{text}'"))),
        }
    }
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?.into_f64()
}

fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(Numeric::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => value.into_f64().map(Some),
        None => Ok(None),
    }
}

/// One row of the broker's open-positions listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerPosition {
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_number")]
    pub qty: f64,
    #[serde(deserialize_with = "deserialize_number")]
    pub avg_entry_price: f64,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub market_value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub cost_basis: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub unrealized_pl: Option<f64>,
    /// Today's unrealized P/L as a fraction of the position.
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub unrealized_intraday_plpc: Option<f64>,
}

impl BrokerPosition {
    pub fn parse_list(input: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Sizing view of the row. Missing cost basis and market value are
    /// rebuilt from the quantity and the entry or current price.
    pub fn to_position(&self) -> Result<Position, ValidationErrors> {
        let cost_basis = self
            .cost_basis
            .unwrap_or(self.qty * self.avg_entry_price);
        let current_value = self.market_value.unwrap_or_else(|| {
            self.qty * self.current_price.unwrap_or(self.avg_entry_price)
        });
        Position::new(&self.symbol, self.qty, cost_basis, current_value)
    }
}

impl Portfolio {
    /// Build a portfolio from broker rows, reporting every invalid row.
    pub fn from_broker(rows: &[BrokerPosition], cash: f64) -> Result<Self, ValidationErrors> {
        let mut violations = Violations::default();
        let positions: Vec<Position> = rows
            .iter()
            .filter_map(|row| violations.absorb(row.to_position()))
            .collect();
        violations.finish()?;
        Self::new(positions, cash)
    }
}

/// Last trade and previous close for one ticker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    #[serde(alias = "last_price", deserialize_with = "deserialize_optional_number")]
    pub last: Option<f64>,
    #[serde(
        alias = "previous_close",
        deserialize_with = "deserialize_optional_number"
    )]
    pub prev_close: Option<f64>,
}

impl MarketSnapshot {
    pub fn new(last: f64, prev_close: f64) -> Self {
        Self {
            last: Some(last),
            prev_close: Some(prev_close),
        }
    }
}

/// Facts gathered for one held position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFacts {
    pub symbol: String,
    pub qty: f64,
    pub avg_entry: f64,
    pub market_price: Option<f64>,
    pub prev_close: Option<f64>,
    pub unrealized_pl: Option<f64>,
    pub pct_change_today: Option<f64>,
}

/// Review line for one position. The recommendation text is written by an
/// external generator and starts out empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub facts: ReviewFacts,
    pub reco: String,
}

/// One entry per broker position, in broker order. Positions without a
/// market snapshot are still reviewed, with no market price.
pub fn daily_review(
    positions: &[BrokerPosition],
    snapshots: &HashMap<String, MarketSnapshot>,
) -> Vec<ReviewEntry> {
    positions
        .iter()
        .map(|position| {
            let snapshot = snapshots.get(&position.symbol).copied().unwrap_or_else(|| {
                tracing::debug!(symbol = %position.symbol, "no market snapshot for position");
                MarketSnapshot::default()
            });
            ReviewEntry {
                facts: ReviewFacts {
                    symbol: position.symbol.clone(),
                    qty: position.qty,
                    avg_entry: position.avg_entry_price,
                    market_price: snapshot.last,
                    prev_close: snapshot.prev_close,
                    unrealized_pl: position.unrealized_pl,
                    pct_change_today: position.unrealized_intraday_plpc,
                },
                reco: String::new(),
            }
        })
        .collect()
}
