//! Behavior-driven tests for the evaluation and pick schemas
//!
//! These tests verify that records only exist in a valid state, whether they
//! are built in code or parsed from JSON.

use stockpick_core::{
    assemble, CoreError, Decision, DecisionBuilder, EvaluationDraft, Fundamentals, IsoDate,
    PersonalFitBuilder, Picks, PriceTrend, Recommendation, Section, StockEvaluation,
    TechnicalsBuilder, ValidationError,
};

fn as_of() -> IsoDate {
    IsoDate::parse("2025-06-03").expect("date")
}

fn full_evaluation() -> StockEvaluation {
    let fundamentals = Fundamentals::builder()
        .revenue_yoy_pct_q(37.5)
        .revenue_ttm_musd(1_234.567)
        .operating_margin_pct(-12.25)
        .cash_reserves_musd(900.0)
        .total_debt_musd(400.0)
        .warning("pe_ttm missing from every source");
    let technicals = TechnicalsBuilder {
        price_trend: PriceTrend::Uptrend,
        support_levels: vec![28.5, 26.0],
        resistance_levels: vec![34.0],
        avg_daily_dollar_volume_musd: Some(85.3),
        beta_1y: Some(1.37),
        ..TechnicalsBuilder::default()
    };
    let decision = DecisionBuilder::default()
        .recommendation(Recommendation::Buy)
        .entry_price(30.1)
        .add_level(28.6)
        .target_price(41.0)
        .stop_price(26.9)
        .conviction(4)
        .notes("Scale in on weakness.");

    assemble(
        EvaluationDraft::new("CRNX", as_of())
            .fundamentals(fundamentals)
            .technicals(technicals)
            .personal_fit(PersonalFitBuilder {
                time_horizon_days: 90,
                stop_loss_pct: Some(10.0),
                ..PersonalFitBuilder::default()
            })
            .decision(decision)
            .quick_summary("Phase 3 readout ahead."),
    )
    .expect("valid evaluation")
}

// =============================================================================
// Evaluation: JSON Round Trip
// =============================================================================

#[test]
fn when_evaluation_is_serialized_and_parsed_system_returns_equal_record() {
    // Given: A fully populated evaluation
    let evaluation = full_evaluation();

    // When: It is written to JSON and read back
    let json = evaluation.to_json_pretty().expect("serializes");
    let parsed = StockEvaluation::from_json(&json).expect("parses");

    // Then: Nothing is lost
    assert_eq!(parsed, evaluation);
    assert_eq!(parsed.decision().add_levels(), &[28.6]);
    assert_eq!(parsed.fundamentals().net_debt_musd(), Some(-500.0));
}

#[test]
fn when_parsed_json_is_invalid_system_rejects_it() {
    // Given: A serialized evaluation whose stop is edited above the entry
    let mut json = serde_json::to_value(full_evaluation()).expect("serializes");
    json["decision"]["stop_price"] = serde_json::json!(35.0);

    // When: The edited document is parsed
    let error = StockEvaluation::from_json(&json.to_string()).expect_err("stop above entry");

    // Then: Parsing revalidates and names the decision section
    assert!(error.to_string().contains("decision failed validation"));
}

// =============================================================================
// Decision: Price Level Ordering
// =============================================================================

#[test]
fn when_stop_equals_entry_system_rejects_decision() {
    // Given: Entry and stop both at 10

    // When: The decision is built
    let errors = Decision::builder()
        .entry_price(10.0)
        .stop_price(10.0)
        .build()
        .expect_err("stop must be below entry");

    // Then: The violation carries both prices
    assert!(errors.contains(|error| matches!(
        error,
        ValidationError::StopNotBelowEntry { stop, entry } if *stop == 10.0 && *entry == 10.0
    )));
}

#[test]
fn when_levels_are_ordered_system_accepts_decision() {
    // Given: Stop 9 below entry 10 below target 11

    // When: The decision is built
    let decision = Decision::builder()
        .entry_price(10.0)
        .stop_price(9.0)
        .target_price(11.0)
        .build()
        .expect("ordered levels");

    // Then: Levels are kept and conviction takes its default
    assert_eq!(decision.stop_price(), Some(9.0));
    assert_eq!(decision.target_price(), Some(11.0));
    assert_eq!(decision.conviction(), 3);
}

#[test]
fn when_several_rules_break_system_reports_all_of_them() {
    // Given: A target below entry and an out-of-range conviction

    // When: The decision is built
    let errors = Decision::builder()
        .entry_price(10.0)
        .target_price(8.0)
        .conviction(6)
        .build()
        .expect_err("two violations");

    // Then: Both violations are reported together
    assert_eq!(errors.len(), 2);
}

// =============================================================================
// Assembly: Section Order
// =============================================================================

#[test]
fn when_several_sections_are_invalid_system_reports_the_first_in_order() {
    // Given: Invalid personal fit and invalid decision sections
    let draft = EvaluationDraft::new("CRNX", as_of())
        .personal_fit(PersonalFitBuilder {
            time_horizon_days: 0,
            ..PersonalFitBuilder::default()
        })
        .decision(DecisionBuilder::default().conviction(0));

    // When: The draft is assembled
    let error = assemble(draft).expect_err("invalid sections");

    // Then: Personal fit is validated before the decision
    assert_eq!(error.section, Section::PersonalFit);
}

// =============================================================================
// Picks: Generator Responses
// =============================================================================

const PICKS: &str = r#"[
    {"ticker": "crnx", "recommendation": "buy", "conviction_score": 4,
     "catalyst": {"type": "clinical", "summary": "Phase 3 topline positive",
                  "status": "new", "source_url": "https://example.com/crnx",
                  "date": "2025-06-02"},
     "reasoning": "Readout de-risks the launch.", "as_of_date": "2025-06-03"},
    {"ticker": "NVDA", "recommendation": "buy", "conviction_score": 5,
     "catalyst": {"type": "earnings", "summary": "Data-center beat",
                  "status": "ongoing", "source_url": "https://example.com/nvda",
                  "date": "2025-05-28"},
     "reasoning": "", "as_of_date": "2025-06-03"}
]"#;

#[test]
fn when_generator_response_is_valid_system_keeps_pick_order() {
    // Given: Two well-formed picks

    // When: The response is parsed
    let picks = Picks::parse_json(PICKS).expect("valid picks");

    // Then: Picks keep their order and tickers are normalized
    assert_eq!(picks.len(), 2);
    assert_eq!(picks.as_slice()[0].ticker().as_str(), "CRNX");
    assert_eq!(picks.as_slice()[1].ticker().as_str(), "NVDA");
}

#[test]
fn when_one_pick_is_invalid_system_names_its_index() {
    // Given: A response whose second pick is a "hold" with a bad source URL
    let response = PICKS
        .replace(
            r#""recommendation": "buy", "conviction_score": 5"#,
            r#""recommendation": "hold", "conviction_score": 5"#,
        )
        .replace("https://example.com/nvda", "ftp://example.com/nvda");

    // When: The response is parsed
    let error = Picks::parse_json(&response).expect_err("invalid second pick");

    // Then: The error points at pick #1 and lists both problems
    match error {
        CoreError::InvalidPick { index, errors } => {
            assert_eq!(index, 1);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}
