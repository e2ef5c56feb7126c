//! # Fundamentals Normalizer
//!
//! Reconciles raw provider payloads into one [`Fundamentals`] record.
//!
//! ## Sources
//!
//! | Field | Preferred source | Fallback |
//! |-------|------------------|----------|
//! | `revenue_yoy_pct_q` | 5 quarterly statements | none |
//! | `revenue_yoy_pct_ttm` | 8 quarterly statements | none |
//! | `revenue_ttm_musd` | last 4 quarterly statements | quote `total_revenue` |
//! | `operating_margin_pct` | latest quarterly statement | quote `operating_margin` x 100 |
//! | `cash_reserves_musd` | balance sheet `cash` | quote `total_cash` |
//! | `total_debt_musd` | balance sheet `total_debt` | quote `total_debt` |
//! | `pe_ttm`, `ps_ttm`, `market_cap_musd` | quote | none |
//!
//! Missing inputs produce `None`, never zero. Anything that cannot be derived
//! or falls outside its bound is recorded as a warning on the record; the
//! normalizer itself never fails, and provider errors are folded into
//! warnings at this boundary.

mod metrics;
mod payload;
mod provider;

pub use payload::{BalanceSheet, ProviderPayload, QuarterlyIncome, QuoteSnapshot};
pub use provider::{
    FundamentalsProvider, JsonPayloadProvider, ProviderFetchError, ProviderFetchErrorKind,
};

use metrics::{
    bound_operating_margin, operating_margin_latest, revenue_ttm, revenue_yoy_quarterly,
    revenue_yoy_ttm, to_millions, Derived,
};

use crate::{DataQualityWarning, Fundamentals, Ticker};

/// Statement rows oldest to newest. Rows are sorted by `period_end` only when
/// every row has one; otherwise the provider's order is trusted.
fn ordered_quarters(rows: &[QuarterlyIncome]) -> Vec<&QuarterlyIncome> {
    let mut ordered: Vec<&QuarterlyIncome> = rows.iter().collect();
    if ordered.iter().all(|row| row.period_end.is_some()) {
        ordered.sort_by_key(|row| row.period_end);
    }
    ordered
}

fn snapshot_field(
    field: &'static str,
    source: &'static str,
    primary: Option<f64>,
    fallback: Option<f64>,
) -> Derived {
    primary
        .map(Derived::value)
        .unwrap_or_default()
        .or_fallback(field, source, fallback)
}

/// Normalize one payload into a [`Fundamentals`] record.
pub fn normalize(payload: &ProviderPayload) -> Fundamentals {
    normalize_with(payload, Vec::new())
}

fn normalize_with(payload: &ProviderPayload, prior: Vec<DataQualityWarning>) -> Fundamentals {
    let quarters = ordered_quarters(payload.income_statements());
    let quote = payload.quote.clone().unwrap_or_default();
    let balance = payload.balance_sheet.clone().unwrap_or_default();

    let yoy_q = revenue_yoy_quarterly(&quarters);
    let yoy_ttm = revenue_yoy_ttm(&quarters);
    let ttm = revenue_ttm(&quarters).or_fallback(
        "revenue_ttm_musd",
        "quote.total_revenue",
        quote.total_revenue.map(to_millions),
    );
    let margin = bound_operating_margin(operating_margin_latest(&quarters).or_fallback(
        "operating_margin_pct",
        "quote.operating_margin",
        quote.operating_margin.map(|ratio| ratio * 100.0),
    ));
    let cash = snapshot_field(
        "cash_reserves_musd",
        "quote.total_cash",
        balance.cash.map(to_millions),
        quote.total_cash.map(to_millions),
    );
    let debt = snapshot_field(
        "total_debt_musd",
        "quote.total_debt",
        balance.total_debt.map(to_millions),
        quote.total_debt.map(to_millions),
    );

    let warnings = prior
        .into_iter()
        .chain(yoy_q.warnings)
        .chain(yoy_ttm.warnings)
        .chain(ttm.warnings)
        .chain(margin.warnings)
        .chain(cash.warnings)
        .chain(debt.warnings)
        .map(|warning| warning.to_string());

    let fundamentals = Fundamentals::builder()
        .revenue_yoy_pct_q(yoy_q.value)
        .revenue_yoy_pct_ttm(yoy_ttm.value)
        .revenue_ttm_musd(ttm.value)
        .operating_margin_pct(margin.value)
        .pe_ttm(quote.pe_ttm)
        .ps_ttm(quote.ps_ttm)
        .cash_reserves_musd(cash.value)
        .total_debt_musd(debt.value)
        .market_cap_musd(quote.market_cap.map(to_millions))
        .warnings(warnings)
        .build_lenient();

    if fundamentals.has_warnings() {
        tracing::debug!(
            warnings = fundamentals.warnings().len(),
            "normalized fundamentals with data-quality warnings"
        );
    }
    fundamentals
}

fn provider_failure(provider: &str, error: &ProviderFetchError) -> DataQualityWarning {
    tracing::warn!(
        provider,
        code = error.code(),
        retryable = error.retryable(),
        "fundamentals provider failed: {}",
        error.message()
    );
    DataQualityWarning::ProviderFailure {
        provider: provider.to_owned(),
        message: error.to_string(),
    }
}

/// Fetch from `provider` and normalize. A failed fetch yields a record
/// holding only the failure warning.
pub fn normalize_from<P>(provider: &P, ticker: &Ticker) -> Fundamentals
where
    P: FundamentalsProvider + ?Sized,
{
    let _span = tracing::debug_span!("normalize", ticker = %ticker, provider = provider.name())
        .entered();
    match provider.fetch(ticker) {
        Ok(payload) => normalize(&payload),
        Err(error) => Fundamentals::warnings_only([provider_failure(provider.name(), &error)]),
    }
}

/// Fetch from every provider and normalize the merged payload.
///
/// Earlier providers take priority; later ones only fill gaps. Each failed
/// provider contributes a warning, and if none succeeds the record holds
/// only those warnings.
pub fn normalize_from_all(providers: &[&dyn FundamentalsProvider], ticker: &Ticker) -> Fundamentals {
    let _span = tracing::debug_span!("normalize", ticker = %ticker, providers = providers.len())
        .entered();

    let mut merged: Option<ProviderPayload> = None;
    let mut failures = Vec::new();
    for provider in providers {
        match provider.fetch(ticker) {
            Ok(payload) => {
                merged = Some(match merged {
                    Some(primary) => primary.merge(payload),
                    None => payload,
                });
            }
            Err(error) => failures.push(provider_failure(provider.name(), &error)),
        }
    }

    match merged {
        Some(payload) => normalize_with(&payload, failures),
        None => Fundamentals::warnings_only(failures),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IsoDate;

    struct Failing;

    impl FundamentalsProvider for Failing {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fetch(&self, _ticker: &Ticker) -> Result<ProviderPayload, ProviderFetchError> {
            Err(ProviderFetchError::unavailable("connection reset"))
        }
    }

    fn ticker() -> Ticker {
        Ticker::parse("CRNX").expect("valid")
    }

    fn quarters(revenues: &[f64]) -> Vec<QuarterlyIncome> {
        revenues.iter().map(|r| QuarterlyIncome::new(*r)).collect()
    }

    fn date(value: &str) -> IsoDate {
        IsoDate::parse(value).expect("date")
    }

    #[test]
    fn derives_growth_from_statements() {
        let payload =
            ProviderPayload::default().with_income_statements(quarters(&[80.0, 90.0, 95.0, 100.0, 110.0]));
        let fundamentals = normalize(&payload);
        assert_eq!(fundamentals.revenue_yoy_pct_q(), Some(37.5));
        assert_eq!(fundamentals.revenue_yoy_pct_ttm(), None);
        assert!(!fundamentals.has_warnings(), "{:?}", fundamentals.warnings());
    }

    #[test]
    fn three_quarters_leave_growth_null_with_warning() {
        let payload =
            ProviderPayload::default().with_income_statements(quarters(&[95.0, 100.0, 110.0]));
        let fundamentals = normalize(&payload);
        assert_eq!(fundamentals.revenue_yoy_pct_q(), None);
        assert!(fundamentals.warnings()[0].contains("insufficient quarterly history"));
    }

    #[test]
    fn rows_are_sorted_by_period_end_when_dated() {
        let rows = vec![
            QuarterlyIncome::new(110.0).with_period_end(date("2025-03-31")),
            QuarterlyIncome::new(80.0).with_period_end(date("2024-03-31")),
            QuarterlyIncome::new(100.0).with_period_end(date("2024-12-31")),
            QuarterlyIncome::new(90.0).with_period_end(date("2024-06-30")),
            QuarterlyIncome::new(95.0).with_period_end(date("2024-09-30")),
        ];
        let fundamentals = normalize(&ProviderPayload::default().with_income_statements(rows));
        assert_eq!(fundamentals.revenue_yoy_pct_q(), Some(37.5));
    }

    #[test]
    fn undated_rows_keep_provider_order() {
        let rows = vec![
            QuarterlyIncome::new(110.0).with_period_end(date("2025-03-31")),
            QuarterlyIncome::new(90.0),
            QuarterlyIncome::new(95.0),
            QuarterlyIncome::new(100.0),
            QuarterlyIncome::new(80.0),
        ];
        let fundamentals = normalize(&ProviderPayload::default().with_income_statements(rows));
        assert_eq!(fundamentals.revenue_yoy_pct_q(), Some(-100.0 * 30.0 / 110.0));
    }

    #[test]
    fn scales_snapshot_fields_to_millions() {
        let payload = ProviderPayload::default()
            .with_balance_sheet(BalanceSheet {
                cash: Some(2_500_000_000.0),
                total_debt: Some(1_000_000_000.0),
            })
            .with_quote(QuoteSnapshot {
                market_cap: Some(31_000_000_000.0),
                pe_ttm: Some(24.5),
                ..QuoteSnapshot::default()
            });
        let fundamentals = normalize(&payload);
        assert_eq!(fundamentals.cash_reserves_musd(), Some(2500.0));
        assert_eq!(fundamentals.total_debt_musd(), Some(1000.0));
        assert_eq!(fundamentals.net_debt_musd(), Some(-1500.0));
        assert_eq!(fundamentals.market_cap_musd(), Some(31_000.0));
        assert_eq!(fundamentals.pe_ttm(), Some(24.5));
        assert_eq!(fundamentals.ps_ttm(), None);
    }

    #[test]
    fn falls_back_to_quote_snapshot() {
        let payload = ProviderPayload::default()
            .with_income_statements(quarters(&[1.0e9, 1.1e9]))
            .with_quote(QuoteSnapshot {
                total_revenue: Some(4_200_000_000.0),
                operating_margin: Some(0.25),
                total_cash: Some(3_000_000.0),
                ..QuoteSnapshot::default()
            });
        let fundamentals = normalize(&payload);
        assert_eq!(fundamentals.revenue_ttm_musd(), Some(4200.0));
        assert_eq!(fundamentals.operating_margin_pct(), Some(25.0));
        assert_eq!(fundamentals.cash_reserves_musd(), Some(3.0));
        assert_eq!(fundamentals.total_debt_musd(), None);
        assert_eq!(fundamentals.net_debt_musd(), None);
        assert!(!fundamentals
            .warnings()
            .iter()
            .any(|w| w.contains("revenue_ttm_musd")));
    }

    #[test]
    fn out_of_bounds_pass_through_is_dropped() {
        let payload = ProviderPayload::default().with_quote(QuoteSnapshot {
            pe_ttm: Some(-12.0),
            ps_ttm: Some(f64::INFINITY),
            ..QuoteSnapshot::default()
        });
        let fundamentals = normalize(&payload);
        assert_eq!(fundamentals.pe_ttm(), None);
        assert_eq!(fundamentals.ps_ttm(), None);
        assert!(fundamentals.warnings().iter().any(|w| w.starts_with("pe_ttm")));
        assert!(fundamentals.warnings().iter().any(|w| w.starts_with("ps_ttm")));
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let payload = ProviderPayload::default()
            .with_income_statements(vec![
                QuarterlyIncome::new(100.0).with_operating_income(-300.0),
                QuarterlyIncome::new(0.0),
            ])
            .with_quote(QuoteSnapshot {
                pe_ttm: Some(-1.0),
                ..QuoteSnapshot::default()
            });
        assert_eq!(normalize(&payload), normalize(&payload));
    }

    #[test]
    fn provider_failure_becomes_warning() {
        let fundamentals = normalize_from(&Failing, &ticker());
        assert!(fundamentals.is_empty());
        assert_eq!(
            fundamentals.warnings(),
            ["failed to fetch fundamentals from flaky: connection reset (provider.unavailable)"]
        );
    }

    #[test]
    fn later_providers_fill_gaps_and_failures_are_kept() {
        let statements = JsonPayloadProvider::new(
            "statements",
            r#"{"income_statements": [{"revenue": 80}, {"revenue": 90}, {"revenue": 95},
                                      {"revenue": 100}, {"revenue": 110}]}"#,
        );
        let quote = JsonPayloadProvider::new("quote", r#"{"quote": {"marketCap": 5.0e9}}"#);
        let providers: [&dyn FundamentalsProvider; 3] = [&statements, &Failing, &quote];

        let fundamentals = normalize_from_all(&providers, &ticker());
        assert_eq!(fundamentals.revenue_yoy_pct_q(), Some(37.5));
        assert_eq!(fundamentals.market_cap_musd(), Some(5000.0));
        assert!(fundamentals.warnings()[0].starts_with("failed to fetch fundamentals from flaky"));
    }

    #[test]
    fn all_providers_failing_yields_warnings_only() {
        let providers: [&dyn FundamentalsProvider; 2] = [&Failing, &Failing];
        let fundamentals = normalize_from_all(&providers, &ticker());
        assert!(fundamentals.is_empty());
        assert_eq!(fundamentals.warnings().len(), 2);
    }
}
