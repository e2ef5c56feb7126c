//! Configuration for sizing, order defaults and guardrails.
//!
//! The core never reads the environment; callers build a [`StockpickConfig`]
//! (usually from a JSON file) and pass the relevant parts down explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OrderType, TimeInForce};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Limits applied to every proposed order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Maximum share of the portfolio one ticker may reach, in percent.
    pub max_position_pct: f64,
    /// Maximum order notional as a percent of average daily dollar volume.
    pub max_pct_of_adv: f64,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            max_position_pct: 20.0,
            max_pct_of_adv: 1.0,
        }
    }
}

/// Order fields the pick itself does not decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDefaults {
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Allocation used when the caller does not name one, in percent.
    pub default_target_pct: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            default_target_pct: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockpickConfig {
    pub guardrails: GuardrailConfig,
    pub orders: OrderDefaults,
    pub sizing: SizingConfig,
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl StockpickConfig {
    /// Parse and validate a JSON document. Missing keys take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&input)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "guardrails.max_position_pct",
            self.guardrails.max_position_pct,
            0.0,
            100.0,
        )?;
        check_range(
            "guardrails.max_pct_of_adv",
            self.guardrails.max_pct_of_adv,
            0.0,
            100.0,
        )?;
        check_range(
            "sizing.default_target_pct",
            self.sizing.default_target_pct,
            0.0,
            100.0,
        )?;
        Ok(())
    }
}
