//! Cart Application
//!
//! Spreads the winning discount back onto the cart lines and works out the final totals.

use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use rusty_money::Money;
use smallvec::SmallVec;

use crate::{
    amounts::Allocation,
    cart::CartSnapshot,
    discounts::DiscountError,
    result::{DiscountResult, ItemDiscount, RuleOutcome},
    rules::DiscountRule,
};

/// Build the final result for `cart` from the winning rule and its allocation.
///
/// The total is `subtotal − discount`, clamped to zero.
///
/// # Errors
///
/// Returns a [`DiscountError`] if the totals cannot be calculated.
pub fn apply<'a>(
    cart: &CartSnapshot<'a>,
    winner: Option<(DiscountRule<'a>, Allocation<'a>)>,
    breakdown: Vec<RuleOutcome>,
) -> Result<DiscountResult<'a>, DiscountError> {
    let currency = cart.currency();
    let subtotal = *cart.subtotal();

    let Some((rule, allocation)) = winner else {
        return Ok(DiscountResult::new(
            subtotal,
            Money::from_minor(0, currency),
            subtotal,
            SmallVec::new(),
            FxHashMap::default(),
            breakdown,
        ));
    };

    let mut item_discounts = FxHashMap::default();

    for share in allocation.lines() {
        let Some(line) = cart.line(share.line) else {
            continue;
        };

        item_discounts.insert(
            line.group_key().to_string(),
            ItemDiscount::new(
                Money::from_minor(share.amount, currency),
                line_percentage(share.amount, line.subtotal().to_minor_units()),
            ),
        );
    }

    let total_discount = *allocation.total();
    let total = subtotal.sub(total_discount)?;
    let total = if total.to_minor_units() < 0 {
        Money::from_minor(0, currency)
    } else {
        total
    };

    let mut applied = SmallVec::new();
    applied.push(rule);

    Ok(DiscountResult::new(
        subtotal,
        total_discount,
        total,
        applied,
        item_discounts,
        breakdown,
    ))
}

/// `amount / line_subtotal × 100` to two decimal places, or zero for a free line.
fn line_percentage(amount: i64, line_subtotal: i64) -> Decimal {
    if line_subtotal == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(amount) * Decimal::ONE_HUNDRED / Decimal::from(line_subtotal))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
