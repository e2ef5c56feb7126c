//! Target-percent position sizing.

use crate::InvalidInputError;

/// Whole shares needed to put `target_pct` percent of `portfolio_value` into
/// a position priced at `price`.
///
/// The result is floored and then clamped to at least one share, so a tiny
/// target in a small portfolio still produces a one-share order even when
/// that share overshoots the target.
///
/// # Errors
///
/// Returns [`InvalidInputError`] when any argument is non-finite, `price` is
/// not positive, `portfolio_value` is negative or `target_pct` is outside
/// `[0, 100]`.
///
/// # Example
///
/// ```rust
/// use stockpick_core::shares_for_target;
///
/// assert_eq!(shares_for_target(10_000.0, 100.0, 5.0)?, 5);
/// assert_eq!(shares_for_target(100.0, 1_000.0, 1.0)?, 1);
/// # Ok::<(), stockpick_core::InvalidInputError>(())
/// ```
pub fn shares_for_target(
    portfolio_value: f64,
    price: f64,
    target_pct: f64,
) -> Result<u64, InvalidInputError> {
    for (argument, value) in [
        ("portfolio_value", portfolio_value),
        ("price", price),
        ("target_pct", target_pct),
    ] {
        if !value.is_finite() {
            return Err(InvalidInputError::NonFinite { argument });
        }
    }
    if price <= 0.0 {
        return Err(InvalidInputError::NonPositivePrice { price });
    }
    if portfolio_value < 0.0 {
        return Err(InvalidInputError::NegativePortfolioValue {
            value: portfolio_value,
        });
    }
    if !(0.0..=100.0).contains(&target_pct) {
        return Err(InvalidInputError::TargetPctOutOfRange { value: target_pct });
    }

    let target_dollars = portfolio_value * target_pct / 100.0;
    let shares = (target_dollars / price).floor();
    // Saturating cast; finite non-negative inputs cannot produce NaN here.
    Ok((shares as u64).max(1))
}
