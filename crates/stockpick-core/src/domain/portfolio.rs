use serde::{Deserialize, Serialize};

use crate::domain::bounds::{check_finite, Bound};
use crate::{Ticker, ValidationError, ValidationErrors, Violations};

/// Holding as reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PositionBuilder")]
pub struct Position {
    ticker: Ticker,
    shares: f64,
    cost_basis: f64,
    current_value: f64,
}

impl Position {
    pub fn new(
        ticker: &str,
        shares: f64,
        cost_basis: f64,
        current_value: f64,
    ) -> Result<Self, ValidationErrors> {
        PositionBuilder {
            ticker: ticker.to_owned(),
            shares,
            cost_basis,
            current_value,
        }
        .build()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    pub fn cost_basis(&self) -> f64 {
        self.cost_basis
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionBuilder {
    pub ticker: String,
    pub shares: f64,
    pub cost_basis: f64,
    pub current_value: f64,
}

impl PositionBuilder {
    pub fn build(self) -> Result<Position, ValidationErrors> {
        let mut violations = Violations::default();
        let ticker = violations.take(Ticker::parse(&self.ticker));
        violations.check(check_finite("shares", self.shares));
        violations.check(check_finite("cost_basis", self.cost_basis));
        violations.check(Bound::NON_NEGATIVE.check("current_value", self.current_value));
        violations.finish()?;

        let ticker = ticker.ok_or(ValidationError::EmptyTicker)?;
        Ok(Position {
            ticker,
            shares: self.shares,
            cost_basis: self.cost_basis,
            current_value: self.current_value,
        })
    }
}

impl TryFrom<PositionBuilder> for Position {
    type Error = ValidationErrors;

    fn try_from(value: PositionBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

/// Ordered positions plus the cash balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PortfolioBuilder")]
pub struct Portfolio {
    positions: Vec<Position>,
    cash: f64,
}

impl Portfolio {
    pub fn new(positions: Vec<Position>, cash: f64) -> Result<Self, ValidationErrors> {
        Bound::NON_NEGATIVE.check("cash", cash)?;
        Ok(Self { positions, cash })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Market value of all positions plus cash.
    pub fn total_value(&self) -> f64 {
        self.positions
            .iter()
            .map(Position::current_value)
            .sum::<f64>()
            + self.cash
    }

    pub fn position_value(&self, ticker: &Ticker) -> f64 {
        self.positions
            .iter()
            .filter(|position| position.ticker() == ticker)
            .map(Position::current_value)
            .sum()
    }

    /// Share of the portfolio held in `ticker`, in percent. Zero when the
    /// ticker is not held or the portfolio is empty.
    pub fn position_pct(&self, ticker: &Ticker) -> f64 {
        let total = self.total_value();
        if total <= 0.0 {
            return 0.0;
        }
        100.0 * self.position_value(ticker) / total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortfolioBuilder {
    pub positions: Vec<PositionBuilder>,
    pub cash: f64,
}

impl PortfolioBuilder {
    pub fn build(self) -> Result<Portfolio, ValidationErrors> {
        let mut violations = Violations::default();
        let positions = self
            .positions
            .into_iter()
            .filter_map(|position| violations.absorb(position.build()))
            .collect();
        violations.check(Bound::NON_NEGATIVE.check("cash", self.cash));
        violations.finish()?;

        Ok(Portfolio {
            positions,
            cash: self.cash,
        })
    }
}

impl TryFrom<PortfolioBuilder> for Portfolio {
    type Error = ValidationErrors;

    fn try_from(value: PortfolioBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![
                Position::new("AAPL", 10.0, 1500.0, 2000.0).expect("valid"),
                Position::new("MSFT", 5.0, 1800.0, 2000.0).expect("valid"),
            ],
            6000.0,
        )
        .expect("valid portfolio")
    }

    #[test]
    fn total_value_includes_cash() {
        assert_eq!(portfolio().total_value(), 10_000.0);
    }

    #[test]
    fn position_pct_of_held_and_missing_tickers() {
        let portfolio = portfolio();
        let aapl = Ticker::parse("AAPL").expect("valid");
        let nvda = Ticker::parse("NVDA").expect("valid");
        assert_eq!(portfolio.position_pct(&aapl), 20.0);
        assert_eq!(portfolio.position_pct(&nvda), 0.0);
    }

    #[test]
    fn empty_portfolio_has_zero_exposure() {
        let ticker = Ticker::parse("AAPL").expect("valid");
        assert_eq!(Portfolio::default().position_pct(&ticker), 0.0);
    }

    #[test]
    fn rejects_negative_cash_and_bad_positions_together() {
        let errors = PortfolioBuilder {
            positions: vec![PositionBuilder {
                ticker: String::new(),
                shares: f64::NAN,
                cost_basis: 10.0,
                current_value: 10.0,
            }],
            cash: -1.0,
        }
        .build()
        .expect_err("three violations");
        assert_eq!(errors.len(), 3);
    }
}
