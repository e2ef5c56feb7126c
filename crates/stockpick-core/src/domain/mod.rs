//! # Domain Records
//!
//! Canonical, validated records exchanged by stockpick.
//!
//! ## Overview
//!
//! Every record is built in two phases: fill a `*Builder` draft, then call
//! `build()`, which checks every field and cross-field rule and returns all
//! violations at once. Parsing a record from JSON goes through the same
//! builder, so serialized records are revalidated on the way back in.
//!
//! ## Records
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Fundamentals`] | Growth, margin, valuation and balance-sheet figures plus data-quality warnings |
//! | [`Catalysts`] | Upcoming earnings, regulatory, product and M&A events |
//! | [`Technicals`] | Trend, levels, liquidity and volatility |
//! | [`MacroSector`] | Sector backdrop and macro risks |
//! | [`PersonalFit`] | Risk tolerance, horizon and percent-based exits |
//! | [`Decision`] | Recommendation with entry/target/stop levels |
//! | [`Pick`] | Trade candidate from the recommendation generator |
//! | [`Position`] / [`Portfolio`] | Broker holdings used for sizing |
//! | [`StockEvaluation`] | All sections for one ticker |
//! | [`Ticker`] | Validated 1-10 character symbol |
//! | [`IsoDate`] | `YYYY-MM-DD` calendar date |
//!
//! ## Validation
//!
//! ```rust
//! use stockpick_core::{Decision, ValidationError};
//!
//! let decision = Decision::builder()
//!     .entry_price(10.0)
//!     .stop_price(10.0)
//!     .build();
//! let errors = decision.expect_err("stop must sit below entry");
//! assert!(errors.contains(|e| matches!(e, ValidationError::StopNotBelowEntry { .. })));
//! ```

pub(crate) mod bounds;
mod date;
mod decision;
mod evaluation;
mod fundamentals;
mod pick;
mod portfolio;
mod sections;
mod ticker;

pub use bounds::Bound;
pub use date::IsoDate;
pub use decision::{Decision, DecisionBuilder, Recommendation};
pub use evaluation::StockEvaluation;
pub use fundamentals::{DataQualityWarning, Fundamentals, FundamentalsBuilder};
pub use pick::{Catalyst, CatalystBuilder, CatalystStatus, Pick, PickBuilder, Picks};
pub use portfolio::{Portfolio, PortfolioBuilder, Position, PositionBuilder};
pub use sections::{
    Catalysts, CatalystsBuilder, MacroSector, MacroSectorBuilder, PersonalFit,
    PersonalFitBuilder, PriceTrend, RiskTolerance, Technicals, TechnicalsBuilder,
};
pub use ticker::Ticker;
