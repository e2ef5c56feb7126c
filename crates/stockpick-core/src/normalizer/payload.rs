//! Raw provider payloads.
//!
//! Every field is optional: providers omit, null out or rename fields freely,
//! and the normalizer decides what to derive from whatever is present. Field
//! aliases cover the camelCase names used by the statement and quote
//! providers. Monetary amounts are raw USD.

use serde::{Deserialize, Serialize};

use crate::IsoDate;

/// One quarterly income-statement row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarterlyIncome {
    #[serde(alias = "date", alias = "periodEnd")]
    pub period_end: Option<IsoDate>,
    pub revenue: Option<f64>,
    #[serde(alias = "operatingIncome")]
    pub operating_income: Option<f64>,
}

impl QuarterlyIncome {
    pub fn new(revenue: impl Into<Option<f64>>) -> Self {
        Self {
            revenue: revenue.into(),
            ..Self::default()
        }
    }

    pub fn with_period_end(mut self, period_end: IsoDate) -> Self {
        self.period_end = Some(period_end);
        self
    }

    pub fn with_operating_income(mut self, operating_income: impl Into<Option<f64>>) -> Self {
        self.operating_income = operating_income.into();
        self
    }
}

/// Most recent balance-sheet snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    #[serde(alias = "cashAndCashEquivalents")]
    pub cash: Option<f64>,
    #[serde(alias = "totalDebt")]
    pub total_debt: Option<f64>,
}

impl BalanceSheet {
    fn or(self, fallback: Self) -> Self {
        Self {
            cash: self.cash.or(fallback.cash),
            total_debt: self.total_debt.or(fallback.total_debt),
        }
    }
}

/// Quote/summary snapshot. `operating_margin` is a ratio, not a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSnapshot {
    #[serde(alias = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(alias = "pe", alias = "trailingPE")]
    pub pe_ttm: Option<f64>,
    #[serde(alias = "priceToSalesTrailing12Months")]
    pub ps_ttm: Option<f64>,
    #[serde(alias = "totalRevenue")]
    pub total_revenue: Option<f64>,
    #[serde(alias = "operatingMargins")]
    pub operating_margin: Option<f64>,
    #[serde(alias = "cash", alias = "totalCash")]
    pub total_cash: Option<f64>,
    #[serde(alias = "totalDebt")]
    pub total_debt: Option<f64>,
}

impl QuoteSnapshot {
    fn or(self, fallback: Self) -> Self {
        Self {
            market_cap: self.market_cap.or(fallback.market_cap),
            pe_ttm: self.pe_ttm.or(fallback.pe_ttm),
            ps_ttm: self.ps_ttm.or(fallback.ps_ttm),
            total_revenue: self.total_revenue.or(fallback.total_revenue),
            operating_margin: self.operating_margin.or(fallback.operating_margin),
            total_cash: self.total_cash.or(fallback.total_cash),
            total_debt: self.total_debt.or(fallback.total_debt),
        }
    }
}

/// Everything one provider returned for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderPayload {
    #[serde(alias = "incomeStatements", alias = "income_statement")]
    pub income_statements: Option<Vec<QuarterlyIncome>>,
    #[serde(alias = "balanceSheet")]
    pub balance_sheet: Option<BalanceSheet>,
    pub quote: Option<QuoteSnapshot>,
}

impl ProviderPayload {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn with_income_statements(mut self, rows: Vec<QuarterlyIncome>) -> Self {
        self.income_statements = Some(rows);
        self
    }

    pub fn with_balance_sheet(mut self, balance_sheet: BalanceSheet) -> Self {
        self.balance_sheet = Some(balance_sheet);
        self
    }

    pub fn with_quote(mut self, quote: QuoteSnapshot) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn income_statements(&self) -> &[QuarterlyIncome] {
        self.income_statements.as_deref().unwrap_or_default()
    }

    /// Combine with a lower-priority payload. Statement rows are taken whole
    /// from the first payload that has any; snapshot fields are filled one by
    /// one.
    pub fn merge(self, fallback: Self) -> Self {
        let income_statements = match self.income_statements {
            Some(rows) if !rows.is_empty() => Some(rows),
            _ => fallback.income_statements,
        };
        let balance_sheet = match (self.balance_sheet, fallback.balance_sheet) {
            (Some(primary), Some(secondary)) => Some(primary.or(secondary)),
            (primary, secondary) => primary.or(secondary),
        };
        let quote = match (self.quote, fallback.quote) {
            (Some(primary), Some(secondary)) => Some(primary.or(secondary)),
            (primary, secondary) => primary.or(secondary),
        };
        Self {
            income_statements,
            balance_sheet,
            quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_statement_provider_field_names() {
        let payload = ProviderPayload::from_json(
            r#"{
                "incomeStatements": [
                    {"date": "2024-12-31", "revenue": 1.2e9, "operatingIncome": 2.4e8,
                     "grossProfit": 6.0e8}
                ],
                "balanceSheet": {"cashAndCashEquivalents": 5.0e8, "totalDebt": null},
                "quote": {"marketCap": 3.1e10, "pe": 24.5}
            }"#,
        )
        .expect("valid payload");

        let row = &payload.income_statements()[0];
        assert_eq!(row.period_end.map(|d| d.to_string()).as_deref(), Some("2024-12-31"));
        assert_eq!(row.operating_income, Some(2.4e8));
        let balance = payload.balance_sheet.expect("balance sheet");
        assert_eq!(balance.cash, Some(5.0e8));
        assert_eq!(balance.total_debt, None);
        assert_eq!(payload.quote.and_then(|q| q.pe_ttm), Some(24.5));
    }

    #[test]
    fn decodes_quote_summary_field_names() {
        let quote: QuoteSnapshot = serde_json::from_str(
            r#"{"trailingPE": 31.0, "priceToSalesTrailing12Months": 7.5,
                "totalRevenue": 3.9e11, "operatingMargins": 0.31, "totalCash": 6.5e10}"#,
        )
        .expect("valid quote");
        assert_eq!(quote.pe_ttm, Some(31.0));
        assert_eq!(quote.ps_ttm, Some(7.5));
        assert_eq!(quote.operating_margin, Some(0.31));
        assert_eq!(quote.total_cash, Some(6.5e10));
        assert_eq!(quote.market_cap, None);
    }

    #[test]
    fn merge_prefers_primary_and_fills_gaps() {
        let primary = ProviderPayload::default()
            .with_income_statements(vec![QuarterlyIncome::new(100.0)])
            .with_quote(QuoteSnapshot {
                pe_ttm: Some(20.0),
                ..QuoteSnapshot::default()
            });
        let fallback = ProviderPayload::default()
            .with_income_statements(vec![QuarterlyIncome::new(1.0), QuarterlyIncome::new(2.0)])
            .with_balance_sheet(BalanceSheet {
                cash: Some(10.0),
                total_debt: None,
            })
            .with_quote(QuoteSnapshot {
                pe_ttm: Some(99.0),
                market_cap: Some(5.0e9),
                ..QuoteSnapshot::default()
            });

        let merged = primary.merge(fallback);
        assert_eq!(merged.income_statements().len(), 1);
        assert_eq!(merged.balance_sheet.and_then(|b| b.cash), Some(10.0));
        let quote = merged.quote.expect("quote");
        assert_eq!(quote.pe_ttm, Some(20.0));
        assert_eq!(quote.market_cap, Some(5.0e9));
    }

    #[test]
    fn empty_statement_list_falls_through_on_merge() {
        let merged = ProviderPayload::default()
            .with_income_statements(Vec::new())
            .merge(ProviderPayload::default().with_income_statements(vec![QuarterlyIncome::new(7.0)]));
        assert_eq!(merged.income_statements()[0].revenue, Some(7.0));
    }
}
