//! # Stockpick Core
//!
//! Validated records, fundamentals normalization and order sizing for the
//! stockpick equity research workflow.
//!
//! ## Overview
//!
//! This crate provides the pure, synchronous core of stockpick:
//!
//! - **Canonical records** for fundamentals, catalysts, technicals, decisions and picks
//! - **Fundamentals normalizer** turning raw provider payloads into one schema
//! - **Order sizing** from a target allocation to a whole share count
//! - **Guardrails** that accept or reject a proposed order
//! - **Assembler** composing validated sections into a [`StockEvaluation`]
//!
//! No network I/O happens here. Providers, brokers and the recommendation
//! generator are external collaborators whose already-fetched JSON is decoded
//! at the boundary.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`assembler`] | Section-by-section evaluation assembly |
//! | [`broker`] | Broker position rows, market snapshots, daily review |
//! | [`config`] | Guardrail, order and sizing configuration |
//! | [`domain`] | Validated records |
//! | [`error`] | Validation and core error types |
//! | [`guardrails`] | Position and liquidity limits |
//! | [`normalizer`] | Provider payloads and fundamentals derivation |
//! | [`order`] | Proposed orders and the broker submit payload |
//! | [`sizing`] | Target-percent share sizing |
//!
//! ## Quick Start
//!
//! ```rust
//! use stockpick_core::{normalize, shares_for_target, ProviderPayload};
//!
//! let payload: ProviderPayload = serde_json::from_str(
//!     r#"{"income_statements": [
//!         {"revenue": 80.0}, {"revenue": 90.0}, {"revenue": 95.0},
//!         {"revenue": 100.0}, {"revenue": 110.0}
//!     ]}"#,
//! )?;
//! let fundamentals = normalize(&payload);
//! assert_eq!(fundamentals.revenue_yoy_pct_q(), Some(37.5));
//!
//! assert_eq!(shares_for_target(10_000.0, 100.0, 5.0)?, 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! provider payloads ──▶ normalizer ──▶ Fundamentals ──┐
//!                                                      ├──▶ assembler ──▶ StockEvaluation
//!                        other section drafts ─────────┘
//!
//! Pick + price + Portfolio ──▶ sizing ──▶ ProposedOrder ──▶ guardrails ──▶ OrderRequest
//! ```

pub mod assembler;
pub mod broker;
pub mod config;
pub mod domain;
pub mod error;
pub mod guardrails;
pub mod normalizer;
pub mod order;
pub mod sizing;

// Re-export commonly used types at crate root for convenience

// Assembly
pub use assembler::{assemble, AssemblyError, EvaluationDraft, Section};

// Broker boundary
pub use broker::{daily_review, BrokerPosition, MarketSnapshot, ReviewEntry, ReviewFacts};

// Configuration
pub use config::{ConfigError, GuardrailConfig, OrderDefaults, SizingConfig, StockpickConfig};

// Domain records
pub use domain::{
    Bound, Catalyst, CatalystBuilder, CatalystStatus, Catalysts, CatalystsBuilder,
    DataQualityWarning, Decision, DecisionBuilder, Fundamentals, FundamentalsBuilder, IsoDate,
    MacroSector, MacroSectorBuilder, PersonalFit, PersonalFitBuilder, Pick, PickBuilder, Picks,
    Portfolio, PortfolioBuilder, Position, PositionBuilder, PriceTrend, Recommendation,
    RiskTolerance, StockEvaluation, Technicals, TechnicalsBuilder, Ticker,
};

// Error types
pub use error::{CoreError, InvalidInputError, ValidationError, ValidationErrors};
pub(crate) use error::Violations;

// Guardrails
pub use guardrails::{
    passes_guardrails, Guardrail, GuardrailSet, GuardrailVerdict, GuardrailViolation,
    LiquidityLimit, PositionExposure, PositionLimit,
};

// Normalizer
pub use normalizer::{
    normalize, normalize_from, normalize_from_all, BalanceSheet, FundamentalsProvider,
    JsonPayloadProvider, ProviderFetchError, ProviderFetchErrorKind, ProviderPayload,
    QuarterlyIncome, QuoteSnapshot,
};

// Orders and sizing
pub use order::{size_order, OrderRequest, OrderSide, OrderType, ProposedOrder, TimeInForce};
pub use sizing::shares_for_target;
