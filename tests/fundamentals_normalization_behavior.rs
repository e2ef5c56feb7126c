//! Behavior-driven tests for fundamentals normalization
//!
//! These tests verify WHAT a caller gets back when provider data is complete,
//! partial, contradictory or missing entirely.

use stockpick_core::{
    normalize, normalize_from, normalize_from_all, BalanceSheet, FundamentalsProvider,
    JsonPayloadProvider, ProviderFetchError, ProviderPayload, QuarterlyIncome, QuoteSnapshot,
    Ticker,
};

struct RateLimitedProvider;

impl FundamentalsProvider for RateLimitedProvider {
    fn name(&self) -> &str {
        "throttled"
    }

    fn fetch(&self, _ticker: &Ticker) -> Result<ProviderPayload, ProviderFetchError> {
        Err(ProviderFetchError::rate_limited("429 Too Many Requests"))
    }
}

fn ticker() -> Ticker {
    Ticker::parse("CRNX").expect("valid ticker")
}

fn statements(revenues: &[f64]) -> Vec<QuarterlyIncome> {
    revenues.iter().map(|revenue| QuarterlyIncome::new(*revenue)).collect()
}

// =============================================================================
// Normalization: Growth Derivation
// =============================================================================

#[test]
fn when_five_quarters_are_available_system_reports_year_over_year_growth() {
    // Given: Five quarters of revenue, oldest first
    let payload = ProviderPayload::default()
        .with_income_statements(statements(&[80.0, 90.0, 95.0, 100.0, 110.0]));

    // When: The payload is normalized
    let fundamentals = normalize(&payload);

    // Then: Growth compares the latest quarter with the same quarter last year
    assert_eq!(fundamentals.revenue_yoy_pct_q(), Some(37.5));

    // And: Missing TTM growth on a short history is not a data-quality warning
    assert_eq!(fundamentals.revenue_yoy_pct_ttm(), None);
    assert!(!fundamentals.has_warnings(), "{:?}", fundamentals.warnings());
}

#[test]
fn when_history_is_short_system_nulls_growth_and_warns() {
    // Given: Only three quarters of revenue
    let payload =
        ProviderPayload::default().with_income_statements(statements(&[95.0, 100.0, 110.0]));

    // When: The payload is normalized
    let fundamentals = normalize(&payload);

    // Then: Growth is null rather than zero
    assert_eq!(fundamentals.revenue_yoy_pct_q(), None);

    // And: A warning explains why
    assert!(fundamentals
        .warnings()
        .iter()
        .any(|warning| warning.contains("insufficient quarterly history")));
}

#[test]
fn when_eight_quarters_are_available_system_reports_trailing_growth() {
    // Given: Two full years of quarterly revenue in USD
    let payload = ProviderPayload::default().with_income_statements(statements(&[
        100.0e6, 100.0e6, 100.0e6, 100.0e6, 110.0e6, 120.0e6, 130.0e6, 140.0e6,
    ]));

    // When: The payload is normalized
    let fundamentals = normalize(&payload);

    // Then: TTM revenue is in millions and TTM growth compares consecutive years
    assert_eq!(fundamentals.revenue_ttm_musd(), Some(500.0));
    assert_eq!(fundamentals.revenue_yoy_pct_ttm(), Some(25.0));
    assert!(!fundamentals.has_warnings());
}

// =============================================================================
// Normalization: Data Quality
// =============================================================================

#[test]
fn when_operating_margin_is_impossible_system_drops_it_with_value_in_warning() {
    // Given: A quarter whose operating loss is three times revenue
    let payload = ProviderPayload::default().with_income_statements(vec![
        QuarterlyIncome::new(10.0e6).with_operating_income(-30.0e6),
    ]);

    // When: The payload is normalized
    let fundamentals = normalize(&payload);

    // Then: The margin is null and the warning carries the offending figure
    assert_eq!(fundamentals.operating_margin_pct(), None);
    assert!(fundamentals
        .warnings()
        .contains(&String::from("operating margin out of bounds: -300.00%")));
}

#[test]
fn when_only_debt_is_known_system_leaves_net_debt_null() {
    // Given: A balance sheet with debt but no cash figure
    let payload = ProviderPayload::default().with_balance_sheet(BalanceSheet {
        cash: None,
        total_debt: Some(750_000_000.0),
    });

    // When: The payload is normalized
    let fundamentals = normalize(&payload);

    // Then: Debt is scaled to millions and net debt is null, not 750
    assert_eq!(fundamentals.total_debt_musd(), Some(750.0));
    assert_eq!(fundamentals.net_debt_musd(), None);

    // And: Net debt is emitted as null in the JSON form
    let json = serde_json::to_value(&fundamentals).expect("serializes");
    assert!(json["net_debt_musd"].is_null());
}

#[test]
fn when_same_payload_is_normalized_twice_system_returns_identical_records() {
    // Given: A payload that triggers several warnings
    let payload = ProviderPayload::default()
        .with_income_statements(vec![
            QuarterlyIncome::new(0.0),
            QuarterlyIncome::new(5.0e6).with_operating_income(9.0e6),
        ])
        .with_quote(QuoteSnapshot {
            pe_ttm: Some(-4.0),
            market_cap: Some(f64::NAN),
            ..QuoteSnapshot::default()
        });

    // When: It is normalized twice
    let first = normalize(&payload);
    let second = normalize(&payload);

    // Then: Both records, warnings included, are identical
    assert_eq!(first, second);
    assert_eq!(first.warnings(), second.warnings());
}

// =============================================================================
// Normalization: Provider Failures
// =============================================================================

#[test]
fn when_provider_fails_system_returns_warnings_instead_of_error() {
    // Given: A provider that is being rate limited

    // When: Fundamentals are requested through it
    let fundamentals = normalize_from(&RateLimitedProvider, &ticker());

    // Then: No field is populated and the failure is recorded as a warning
    assert!(fundamentals.is_empty());
    assert_eq!(fundamentals.warnings().len(), 1);
    assert!(fundamentals.warnings()[0].contains("throttled"));
}

#[test]
fn when_statements_are_missing_system_falls_back_to_quote_snapshot() {
    // Given: A statement provider that returns garbage and a quote provider that works
    let statements = JsonPayloadProvider::new("statements", "<html>502</html>");
    let quote = JsonPayloadProvider::new(
        "quote",
        r#"{"quote": {"totalRevenue": 2.4e9, "operatingMargins": 0.25,
                      "totalCash": 9.0e8, "totalDebt": 4.0e8, "trailingPE": 22.0}}"#,
    );
    let providers: [&dyn FundamentalsProvider; 2] = [&statements, &quote];

    // When: Fundamentals are normalized across both
    let fundamentals = normalize_from_all(&providers, &ticker());

    // Then: Overlapping fields come from the snapshot
    assert_eq!(fundamentals.revenue_ttm_musd(), Some(2400.0));
    assert_eq!(fundamentals.operating_margin_pct(), Some(25.0));
    assert_eq!(fundamentals.net_debt_musd(), Some(-500.0));
    assert_eq!(fundamentals.pe_ttm(), Some(22.0));

    // And: The broken provider is named in the warnings
    assert!(fundamentals.warnings()[0].starts_with("failed to fetch fundamentals from statements"));
}
