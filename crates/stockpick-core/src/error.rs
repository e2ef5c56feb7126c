use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation and contract errors raised while building `stockpick-core` records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must be a single token, found {ch:?} at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("date must be ISO-8601 YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },
    #[error("field '{field}' must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("field '{field}' must be within [{min}, {max}], got {value}")]
    IntegerOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },
    #[error("field '{field}' length {len} exceeds max {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("source_url must be an absolute http(s) URL: '{value}'")]
    InvalidUrl { value: String },

    #[error("stop_price {stop} must be below entry_price {entry}")]
    StopNotBelowEntry { stop: f64, entry: f64 },
    #[error("target_price {target} must be above entry_price {entry}")]
    TargetNotAboveEntry { target: f64, entry: f64 },
    #[error("pick recommendation must be 'buy', got '{value}'")]
    UnsupportedRecommendation { value: String },
}

/// Every violation found by a single `build()` step. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, predicate: impl Fn(&ValidationError) -> bool) -> bool {
        self.0.iter().any(predicate)
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(value: ValidationError) -> Self {
        Self(vec![value])
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates violations during the validate phase of a builder.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<ValidationError>);

impl Violations {
    pub(crate) fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.0.push(error);
        }
    }

    /// Keep the parsed value, or record why it could not be parsed.
    pub(crate) fn take<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.0.push(error);
                None
            }
        }
    }

    /// Fold a nested record's violations into this collector.
    pub(crate) fn absorb<T>(&mut self, result: Result<T, ValidationErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.0.extend(errors.0);
                None
            }
        }
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

/// Out-of-domain argument passed to a pure sizing/guardrail function.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("argument '{argument}' must be finite")]
    NonFinite { argument: &'static str },
    #[error("price must be positive, got {price}")]
    NonPositivePrice { price: f64 },
    #[error("portfolio value must be non-negative, got {value}")]
    NegativePortfolioValue { value: f64 },
    #[error("target_pct must be within [0, 100], got {value}")]
    TargetPctOutOfRange { value: f64 },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    Assembly(#[from] crate::assembler::AssemblyError),

    #[error("pick #{index} is invalid: {errors}")]
    InvalidPick {
        index: usize,
        errors: ValidationErrors,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value.into())
    }
}
