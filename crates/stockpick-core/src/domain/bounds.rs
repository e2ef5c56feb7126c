use crate::ValidationError;

/// Inclusive numeric range a populated field must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const NON_NEGATIVE: Self = Self::new(0.0, f64::INFINITY);
    pub const PERCENT: Self = Self::new(0.0, 100.0);
    pub const MARGIN_PCT: Self = Self::new(-100.0, 100.0);
    pub const GROWTH_PCT: Self = Self::new(-100.0, 1000.0);
    pub const PROFIT_TARGET_PCT: Self = Self::new(0.0, 1000.0);
    pub const BETA: Self = Self::new(-10.0, 10.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub fn check(self, field: &'static str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }
        if self.contains(value) {
            return Ok(());
        }
        if self.max == f64::INFINITY && self.min == 0.0 {
            return Err(ValidationError::NegativeValue { field, value });
        }
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: self.min,
            max: self.max,
        })
    }

    pub fn check_optional(
        self,
        field: &'static str,
        value: Option<f64>,
    ) -> Result<(), ValidationError> {
        match value {
            Some(value) => self.check(field, value),
            None => Ok(()),
        }
    }
}

pub(crate) fn check_int_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::IntegerOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}

pub(crate) fn check_max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(())
}

pub(crate) fn check_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}
