//! Discount arithmetic
//!
//! Minor-unit helpers shared by every discount shape: percentage application and
//! exact proportional allocation of a discount across cart lines.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::MoneyError;
use smallvec::SmallVec;
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// An intermediate minor-unit amount did not fit the money representation.
    #[error("discount amount overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Build a [`Percentage`] from a number of percentage points (`12.5` is 12.5%).
pub fn percentage_from_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero to whole minor units.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Split `total` minor units across `weights` in proportion to each weight.
///
/// Uses the largest-remainder method: every share is floored, then the units left
/// over are handed out one at a time to the largest remainders, earlier positions
/// winning ties. The shares always sum to exactly `total`. Negative weights count
/// as zero; a non-positive total or weight sum yields all zeros.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if a share cannot be represented in minor units.
pub fn allocate_minor(total: i64, weights: &[i64]) -> Result<SmallVec<[i64; 8]>, DiscountError> {
    let weight_sum: i128 = weights.iter().map(|weight| i128::from((*weight).max(0))).sum();

    if total <= 0 || weight_sum == 0 {
        return Ok(weights.iter().map(|_weight| 0).collect());
    }

    let total = i128::from(total);

    let mut shares: SmallVec<[(usize, i128, i128); 8]> = weights
        .iter()
        .enumerate()
        .map(|(idx, weight)| {
            let scaled = total * i128::from((*weight).max(0));

            (idx, scaled / weight_sum, scaled % weight_sum)
        })
        .collect();

    let assigned: i128 = shares.iter().map(|(_, share, _)| share).sum();
    let leftover = usize::try_from(total - assigned).map_err(|_overflow| DiscountError::Overflow)?;

    shares.sort_by(|(a_idx, _, a_rem), (b_idx, _, b_rem)| b_rem.cmp(a_rem).then(a_idx.cmp(b_idx)));

    for (_, share, _) in shares.iter_mut().take(leftover) {
        *share += 1;
    }

    shares.sort_by_key(|(idx, _, _)| *idx);

    shares
        .into_iter()
        .map(|(_, share, _)| i64::try_from(share).map_err(|_overflow| DiscountError::Overflow))
        .collect()
}
