//! Guardrail checks for proposed orders.
//!
//! Each [`Guardrail`] is a pure predicate over a [`ProposedOrder`] and the
//! ticker's current [`PositionExposure`]. A [`GuardrailSet`] runs every
//! guardrail in insertion order and reports all violations, so new limits
//! can be added without touching existing ones.
//!
//! | Guardrail | Rejects when |
//! |-----------|--------------|
//! | [`PositionLimit`] | existing % + target % > max position % |
//! | [`LiquidityLimit`] | order notional > max % of average daily dollar volume |

use serde::Serialize;
use thiserror::Error;

use crate::{GuardrailConfig, Portfolio, ProposedOrder, Ticker};

/// Current state of the ticker an order is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PositionExposure {
    /// Share of the portfolio already held in the ticker, in percent.
    pub existing_position_pct: f64,
    /// Average daily dollar volume in millions of USD, when known.
    pub avg_daily_dollar_volume_musd: Option<f64>,
}

impl PositionExposure {
    pub fn new(existing_position_pct: f64) -> Self {
        Self {
            existing_position_pct,
            avg_daily_dollar_volume_musd: None,
        }
    }

    pub fn from_portfolio(portfolio: &Portfolio, ticker: &Ticker) -> Self {
        Self::new(portfolio.position_pct(ticker))
    }

    pub fn with_avg_daily_dollar_volume(mut self, musd: impl Into<Option<f64>>) -> Self {
        self.avg_daily_dollar_volume_musd = musd.into();
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum GuardrailViolation {
    #[error(
        "{ticker}: existing {existing_pct:.2}% + target {target_pct:.2}% exceeds max position {max_pct:.2}%"
    )]
    PositionLimit {
        ticker: Ticker,
        existing_pct: f64,
        target_pct: f64,
        max_pct: f64,
    },
    #[error(
        "{ticker}: order notional {notional_musd:.3}M exceeds {max_pct_of_adv:.2}% of average daily volume ({limit_musd:.3}M)"
    )]
    Liquidity {
        ticker: Ticker,
        notional_musd: f64,
        max_pct_of_adv: f64,
        limit_musd: f64,
    },
    #[error("{ticker}: {field} is not a finite number; order rejected")]
    NonFinite { ticker: Ticker, field: &'static str },
}

/// Name of the first non-finite input. NaN compares false against every
/// limit, so these inputs are rejected before any comparison.
fn non_finite(inputs: &[(&'static str, f64)]) -> Option<&'static str> {
    inputs
        .iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| *field)
}

/// Single accept/reject rule.
pub trait Guardrail: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns the [`GuardrailViolation`] describing why `order` is rejected.
    fn evaluate(
        &self,
        order: &ProposedOrder,
        exposure: &PositionExposure,
    ) -> Result<(), GuardrailViolation>;
}

/// Caps the post-trade share of the portfolio held in one ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionLimit {
    pub max_position_pct: f64,
}

impl PositionLimit {
    pub const fn new(max_position_pct: f64) -> Self {
        Self { max_position_pct }
    }
}

impl Guardrail for PositionLimit {
    fn name(&self) -> &'static str {
        "position_limit"
    }

    fn evaluate(
        &self,
        order: &ProposedOrder,
        exposure: &PositionExposure,
    ) -> Result<(), GuardrailViolation> {
        if let Some(field) = non_finite(&[
            ("existing_position_pct", exposure.existing_position_pct),
            ("target_pct", order.target_pct),
            ("max_position_pct", self.max_position_pct),
        ]) {
            return Err(GuardrailViolation::NonFinite {
                ticker: order.ticker.clone(),
                field,
            });
        }
        if exposure.existing_position_pct + order.target_pct > self.max_position_pct {
            return Err(GuardrailViolation::PositionLimit {
                ticker: order.ticker.clone(),
                existing_pct: exposure.existing_position_pct,
                target_pct: order.target_pct,
                max_pct: self.max_position_pct,
            });
        }
        Ok(())
    }
}

/// Caps order notional relative to the ticker's average daily dollar volume.
/// Passes when the volume is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidityLimit {
    pub max_pct_of_adv: f64,
}

impl LiquidityLimit {
    pub const fn new(max_pct_of_adv: f64) -> Self {
        Self { max_pct_of_adv }
    }
}

impl Guardrail for LiquidityLimit {
    fn name(&self) -> &'static str {
        "liquidity_limit"
    }

    fn evaluate(
        &self,
        order: &ProposedOrder,
        exposure: &PositionExposure,
    ) -> Result<(), GuardrailViolation> {
        let Some(adv_musd) = exposure.avg_daily_dollar_volume_musd else {
            tracing::debug!(ticker = %order.ticker, "no volume data; liquidity limit skipped");
            return Ok(());
        };
        if let Some(field) = non_finite(&[
            ("avg_daily_dollar_volume_musd", adv_musd),
            ("reference_price", order.reference_price),
            ("max_pct_of_adv", self.max_pct_of_adv),
        ]) {
            return Err(GuardrailViolation::NonFinite {
                ticker: order.ticker.clone(),
                field,
            });
        }
        let notional_musd = order.notional() / 1_000_000.0;
        let limit_musd = adv_musd * self.max_pct_of_adv / 100.0;
        if notional_musd > limit_musd {
            return Err(GuardrailViolation::Liquidity {
                ticker: order.ticker.clone(),
                notional_musd,
                max_pct_of_adv: self.max_pct_of_adv,
                limit_musd,
            });
        }
        Ok(())
    }
}

/// Outcome of a [`GuardrailSet`] evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuardrailVerdict {
    passed: bool,
    violations: Vec<GuardrailViolation>,
}

impl GuardrailVerdict {
    fn new(violations: Vec<GuardrailViolation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn violations(&self) -> &[GuardrailViolation] {
        &self.violations
    }
}

/// Ordered collection of guardrails.
#[derive(Default)]
pub struct GuardrailSet {
    guardrails: Vec<Box<dyn Guardrail>>,
}

impl std::fmt::Debug for GuardrailSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.guardrails.iter().map(|guardrail| guardrail.name()))
            .finish()
    }
}

impl GuardrailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position and liquidity limits from configuration.
    pub fn from_config(config: &GuardrailConfig) -> Self {
        Self::new()
            .with(PositionLimit::new(config.max_position_pct))
            .with(LiquidityLimit::new(config.max_pct_of_adv))
    }

    pub fn with(mut self, guardrail: impl Guardrail + 'static) -> Self {
        self.guardrails.push(Box::new(guardrail));
        self
    }

    pub fn len(&self) -> usize {
        self.guardrails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guardrails.is_empty()
    }

    pub fn evaluate(&self, order: &ProposedOrder, exposure: &PositionExposure) -> GuardrailVerdict {
        let violations: Vec<GuardrailViolation> = self
            .guardrails
            .iter()
            .filter_map(|guardrail| match guardrail.evaluate(order, exposure) {
                Ok(()) => None,
                Err(violation) => {
                    tracing::warn!(guardrail = guardrail.name(), "{violation}");
                    Some(violation)
                }
            })
            .collect();
        GuardrailVerdict::new(violations)
    }
}

/// True when adding `order.target_pct` to the existing exposure stays within
/// `max_position_pct`. Any non-finite input fails.
pub fn passes_guardrails(
    order: &ProposedOrder,
    max_position_pct: f64,
    existing_position_pct: f64,
) -> bool {
    PositionLimit::new(max_position_pct)
        .evaluate(order, &PositionExposure::new(existing_position_pct))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrderSide, OrderType, TimeInForce};

    fn order(target_pct: f64, qty: u64, price: f64) -> ProposedOrder {
        ProposedOrder {
            ticker: Ticker::parse("CRNX").expect("valid"),
            qty,
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            target_pct,
            reference_price: price,
            limit_price: None,
        }
    }

    #[test]
    fn position_limit_boundary() {
        let order = order(5.0, 10, 50.0);
        assert!(!passes_guardrails(&order, 20.0, 16.0));
        assert!(passes_guardrails(&order, 20.0, 15.0));
    }

    #[test]
    fn non_finite_inputs_never_pass() {
        assert!(!passes_guardrails(&order(5.0, 10, 50.0), 20.0, f64::NAN));
        assert!(!passes_guardrails(&order(5.0, 10, 50.0), f64::NAN, 0.0));
        assert!(!passes_guardrails(&order(f64::NAN, 10, 50.0), 20.0, 99.0));
        assert!(!passes_guardrails(&order(5.0, 10, 50.0), f64::INFINITY, 0.0));

        let violation = PositionLimit::new(20.0)
            .evaluate(&order(5.0, 10, 50.0), &PositionExposure::new(f64::NAN))
            .expect_err("NaN exposure");
        assert_eq!(
            violation,
            GuardrailViolation::NonFinite {
                ticker: Ticker::parse("CRNX").expect("valid"),
                field: "existing_position_pct",
            }
        );
    }

    #[test]
    fn non_finite_volume_fails_liquidity() {
        let exposure = PositionExposure::new(0.0).with_avg_daily_dollar_volume(f64::NAN);
        assert!(matches!(
            LiquidityLimit::new(1.0).evaluate(&order(5.0, 1, 1.0), &exposure),
            Err(GuardrailViolation::NonFinite {
                field: "avg_daily_dollar_volume_musd",
                ..
            })
        ));
    }

    #[test]
    fn liquidity_limit_uses_notional_in_millions() {
        let limit = LiquidityLimit::new(1.0);
        // 20_000 shares x $60 = $1.2M against 1% of $100M = $1M
        let large = order(5.0, 20_000, 60.0);
        let exposure = PositionExposure::new(0.0).with_avg_daily_dollar_volume(100.0);
        let violation = limit.evaluate(&large, &exposure).expect_err("too large");
        assert!(matches!(violation, GuardrailViolation::Liquidity { .. }));

        let small = order(5.0, 1_000, 60.0);
        assert!(limit.evaluate(&small, &exposure).is_ok());
    }

    #[test]
    fn unknown_volume_passes_liquidity() {
        let limit = LiquidityLimit::new(0.0);
        assert!(limit
            .evaluate(&order(5.0, 1_000_000, 500.0), &PositionExposure::new(0.0))
            .is_ok());
    }

    #[test]
    fn set_reports_every_violation_in_order() {
        let set = GuardrailSet::from_config(&GuardrailConfig::default());
        let exposure = PositionExposure::new(18.0).with_avg_daily_dollar_volume(1.0);
        let verdict = set.evaluate(&order(5.0, 1_000, 100.0), &exposure);

        assert!(!verdict.passed());
        assert_eq!(verdict.violations().len(), 2);
        assert!(matches!(
            verdict.violations()[0],
            GuardrailViolation::PositionLimit { .. }
        ));
        assert!(matches!(
            verdict.violations()[1],
            GuardrailViolation::Liquidity { .. }
        ));
    }

    #[test]
    fn empty_set_passes() {
        let verdict = GuardrailSet::new().evaluate(&order(50.0, 1, 1.0), &PositionExposure::default());
        assert!(verdict.passed());
    }

    #[test]
    fn violation_serializes_with_rule_tag() {
        let verdict = GuardrailSet::new()
            .with(PositionLimit::new(10.0))
            .evaluate(&order(5.0, 1, 1.0), &PositionExposure::new(8.0));
        let json = serde_json::to_value(&verdict).expect("serializes");
        assert_eq!(json["passed"], false);
        assert_eq!(json["violations"][0]["rule"], "position_limit");
        assert_eq!(json["violations"][0]["ticker"], "CRNX");
    }
}
