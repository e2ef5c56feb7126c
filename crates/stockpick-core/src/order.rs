//! Proposed orders and the broker submit payload.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{shares_for_target, InvalidInputError, OrderDefaults, Pick, Portfolio, Ticker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl Display for OrderSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    Day,
    Gtc,
}

/// Sized order awaiting guardrail checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedOrder {
    pub ticker: Ticker,
    pub qty: u64,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Allocation the order was sized for, in percent of the portfolio.
    pub target_pct: f64,
    pub reference_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
}

impl ProposedOrder {
    /// Quantity times reference price, in USD.
    pub fn notional(&self) -> f64 {
        self.qty as f64 * self.reference_price
    }

    pub fn to_request(&self) -> OrderRequest {
        OrderRequest {
            symbol: self.ticker.to_string(),
            qty: self.qty,
            side: self.side,
            order_type: self.order_type,
            time_in_force: self.time_in_force,
            limit_price: self.limit_price,
        }
    }
}

/// Order submit payload in the broker's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: u64,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
}

/// Size a buy order for `pick` at `price` against the portfolio's total value.
///
/// Limit orders are placed at `price`.
///
/// # Errors
///
/// Propagates [`InvalidInputError`] from [`shares_for_target`].
pub fn size_order(
    pick: &Pick,
    price: f64,
    portfolio: &Portfolio,
    target_pct: f64,
    defaults: &OrderDefaults,
) -> Result<ProposedOrder, InvalidInputError> {
    let qty = shares_for_target(portfolio.total_value(), price, target_pct)?;
    let limit_price = match defaults.order_type {
        OrderType::Limit => Some(price),
        OrderType::Market => None,
    };
    tracing::debug!(
        ticker = %pick.ticker(),
        qty,
        target_pct,
        price,
        "sized order"
    );
    Ok(ProposedOrder {
        ticker: pick.ticker().clone(),
        qty,
        side: OrderSide::Buy,
        order_type: defaults.order_type,
        time_in_force: defaults.time_in_force,
        target_pct,
        reference_price: price,
        limit_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalystBuilder, CatalystStatus, IsoDate, PickBuilder, Position, Recommendation};

    fn pick() -> Pick {
        PickBuilder {
            ticker: String::from("NVDA"),
            recommendation: Recommendation::Buy,
            conviction_score: 4,
            catalyst: CatalystBuilder {
                kind: String::from("earnings"),
                summary: String::from("Data-center revenue beat"),
                status: CatalystStatus::New,
                source_url: String::from("https://example.com/nvda"),
                date: IsoDate::parse("2025-05-28").expect("date"),
            },
            reasoning: String::from("Guidance raised."),
            as_of_date: IsoDate::parse("2025-05-29").expect("date"),
        }
        .build()
        .expect("valid pick")
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![Position::new("AAPL", 10.0, 1_500.0, 2_000.0).expect("valid")],
            8_000.0,
        )
        .expect("valid")
    }

    #[test]
    fn sizes_against_total_portfolio_value() {
        let order = size_order(&pick(), 100.0, &portfolio(), 5.0, &OrderDefaults::default())
            .expect("valid");
        assert_eq!(order.qty, 5);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.limit_price, None);
        assert_eq!(order.notional(), 500.0);
    }

    #[test]
    fn limit_orders_carry_the_price() {
        let defaults = OrderDefaults {
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
        };
        let order = size_order(&pick(), 100.0, &portfolio(), 5.0, &defaults).expect("valid");
        assert_eq!(order.limit_price, Some(100.0));
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
    }

    #[test]
    fn request_uses_broker_field_names() {
        let order = size_order(&pick(), 100.0, &portfolio(), 5.0, &OrderDefaults::default())
            .expect("valid");
        let json = serde_json::to_value(order.to_request()).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "NVDA",
                "qty": 5,
                "side": "buy",
                "type": "market",
                "time_in_force": "day"
            })
        );
    }

    #[test]
    fn invalid_price_is_propagated() {
        assert!(matches!(
            size_order(&pick(), 0.0, &portfolio(), 5.0, &OrderDefaults::default()),
            Err(InvalidInputError::NonPositivePrice { .. })
        ));
    }
}
