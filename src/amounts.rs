//! Amount Calculation
//!
//! Computes how much a matched rule is worth and how that amount is spread across the
//! matched lines.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    cart::CartSnapshot,
    context::EvaluationContext,
    discounts::{DiscountError, allocate_minor, percent_of_minor, percentage_from_points},
    eligibility::Rejection,
    matching::{MatchedLine, TargetMatch},
    rules::{DiscountRule, DiscountValue},
};

/// A discount value with any transaction-time amount filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue<'a> {
    /// Percentage of the matched lines, optionally capped.
    Percentage {
        /// Percentage to apply
        percent: Percentage,
        /// Maximum discount value
        cap: Option<Money<'a, Currency>>,
    },

    /// Fixed amount, clamped to the matched lines.
    Fixed(Money<'a, Currency>),
}

/// Resolve a rule's value, pulling variable amounts from the context.
///
/// Negative entered amounts are clamped to zero; entered amounts are rounded half away
/// from zero to whole minor units.
///
/// # Errors
///
/// Returns [`Rejection::VariableAmountMissing`] if a variable rule has no entered amount.
pub fn resolve_value<'a>(
    rule: &DiscountRule<'a>,
    context: &EvaluationContext,
    currency: &'a Currency,
) -> Result<ResolvedValue<'a>, Rejection> {
    let entered = || {
        context
            .variable_amounts()
            .get(rule.id())
            .map(|amount| amount.max(Decimal::ZERO))
            .ok_or(Rejection::VariableAmountMissing)
    };

    match rule.value() {
        DiscountValue::Percentage { points, cap } => Ok(ResolvedValue::Percentage {
            percent: percentage_from_points(*points),
            cap: *cap,
        }),
        DiscountValue::Fixed(amount) => Ok(ResolvedValue::Fixed(*amount)),
        DiscountValue::VariablePercentage { cap } => Ok(ResolvedValue::Percentage {
            percent: percentage_from_points(entered()?),
            cap: *cap,
        }),
        DiscountValue::VariableAmount => {
            let minor = entered()?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .unwrap_or(i64::MAX);

            Ok(ResolvedValue::Fixed(Money::from_minor(minor, currency)))
        }
    }
}

/// The share of a discount allocated to one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAllocation {
    /// Index of the line in the cart
    pub line: usize,

    /// Discount on the line in minor units
    pub amount: i64,
}

/// A rule's discount total and its per-line split.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation<'a> {
    total: Money<'a, Currency>,
    lines: SmallVec<[LineAllocation; 8]>,
}

impl<'a> Allocation<'a> {
    /// Total discount.
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// Per-line split, in cart order. Always sums to [`Allocation::total`].
    pub fn lines(&self) -> &[LineAllocation] {
        &self.lines
    }

    /// Returns true if the rule is worth nothing.
    pub fn is_zero(&self) -> bool {
        self.total.to_minor_units() == 0
    }
}

/// Calculate the discount for a matched rule.
///
/// Whole-line matches share one amount in proportion to each line's value. BOGO unit
/// matches are discounted per unit, then capped. The result never exceeds the value of
/// the matched units.
///
/// # Errors
///
/// Returns a [`DiscountError`] if an intermediate amount overflows.
pub fn calculate_amount<'a>(
    value: &ResolvedValue<'a>,
    matched: &TargetMatch,
    cart: &CartSnapshot<'a>,
) -> Result<Allocation<'a>, DiscountError> {
    let currency = cart.currency();
    let weights = matched_values(matched.lines(), cart)?;
    let matched_subtotal = weights
        .iter()
        .try_fold(0_i64, |acc, weight| acc.checked_add(*weight))
        .ok_or(DiscountError::Overflow)?;

    let (total, shares) = match matched {
        TargetMatch::Lines(_) => {
            let total = match value {
                ResolvedValue::Percentage { percent, cap } => {
                    let raw = percent_of_minor(percent, matched_subtotal)?;

                    apply_cap(raw, cap.as_ref())
                }
                ResolvedValue::Fixed(amount) => amount.to_minor_units(),
            }
            .clamp(0, matched_subtotal);

            (total, allocate_minor(total, &weights)?)
        }
        TargetMatch::Units(lines) => {
            let per_line = lines
                .iter()
                .zip(&weights)
                .map(|(matched, unit_value)| per_unit_discount(value, matched, *unit_value, cart))
                .collect::<Result<SmallVec<[i64; 8]>, _>>()?;

            let raw = per_line
                .iter()
                .try_fold(0_i64, |acc, amount| acc.checked_add(*amount))
                .ok_or(DiscountError::Overflow)?;

            let cap = match value {
                ResolvedValue::Percentage { cap, .. } => cap.as_ref(),
                ResolvedValue::Fixed(_) => None,
            };

            let total = apply_cap(raw, cap);

            if total == raw {
                (total, per_line)
            } else {
                (total, allocate_minor(total, &per_line)?)
            }
        }
    };

    Ok(Allocation {
        total: Money::from_minor(total, currency),
        lines: matched
            .lines()
            .iter()
            .zip(shares)
            .map(|(matched, amount)| LineAllocation {
                line: matched.line,
                amount,
            })
            .collect(),
    })
}

/// Discount on the granted units of one BOGO reward line, never more than their value.
fn per_unit_discount(
    value: &ResolvedValue<'_>,
    matched: &MatchedLine,
    units_value: i64,
    cart: &CartSnapshot<'_>,
) -> Result<i64, DiscountError> {
    let amount = match value {
        ResolvedValue::Percentage { percent, .. } => percent_of_minor(percent, units_value)?,
        ResolvedValue::Fixed(amount) => {
            let unit_price = cart
                .line(matched.line)
                .map_or(0, |line| line.unit_price().to_minor_units());

            amount
                .to_minor_units()
                .clamp(0, unit_price)
                .checked_mul(i64::from(matched.quantity))
                .ok_or(DiscountError::Overflow)?
        }
    };

    Ok(amount.clamp(0, units_value))
}

/// `unit price × matched quantity` of every matched line.
fn matched_values(
    lines: &[MatchedLine],
    cart: &CartSnapshot<'_>,
) -> Result<SmallVec<[i64; 8]>, DiscountError> {
    lines
        .iter()
        .map(|matched| {
            let unit_price = cart
                .line(matched.line)
                .map_or(0, |line| line.unit_price().to_minor_units());

            unit_price
                .checked_mul(i64::from(matched.quantity))
                .ok_or(DiscountError::Overflow)
        })
        .collect()
}

fn apply_cap(amount: i64, cap: Option<&Money<'_, Currency>>) -> i64 {
    cap.map_or(amount, |cap| amount.min(cap.to_minor_units()))
}
