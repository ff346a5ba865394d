//! Eligibility
//!
//! Decides whether a rule is active for the current moment and cart, and if not,
//! why not. Checks run in a fixed order and the first failure is reported.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    context::EvaluationContext,
    rules::{
        DiscountRule, Mode,
        schedule::{DateRangeCheck, ScheduleCheck},
    },
};

/// Why an otherwise valid rule did not take part in a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The rule is manual / coupon only.
    NotAutomatic,

    /// Today is before the rule's first date.
    BeforeDateRange,

    /// Today is after the rule's last date.
    AfterDateRange,

    /// Today's weekday is not scheduled.
    InactiveWeekday,

    /// The current time is outside the scheduled window.
    OutsideScheduleWindow,

    /// The schedule starts after it ends.
    ScheduleMisconfigured,

    /// The cart subtotal is below the rule's minimum spend.
    BelowMinimumSpend,

    /// A variable rule had no amount entered at transaction time.
    VariableAmountMissing,
}

impl Rejection {
    /// Stable reason code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotAutomatic => "not_automatic",
            Self::BeforeDateRange => "before_date_range",
            Self::AfterDateRange => "after_date_range",
            Self::InactiveWeekday => "inactive_weekday",
            Self::OutsideScheduleWindow => "outside_schedule_window",
            Self::ScheduleMisconfigured => "schedule_misconfigured",
            Self::BelowMinimumSpend => "below_minimum_spend",
            Self::VariableAmountMissing => "variable_amount_missing",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Checks that do not depend on a cart: automatic flag, date range and schedule.
///
/// # Errors
///
/// Returns the first failing check as a [`Rejection`].
pub fn check_temporal(
    rule: &DiscountRule<'_>,
    context: &EvaluationContext,
) -> Result<(), Rejection> {
    if matches!(rule.mode(), Mode::Manual) {
        return Err(Rejection::NotAutomatic);
    }

    let now = context.now();

    if let Some(date_range) = rule.date_range() {
        match date_range.check(now.date()) {
            DateRangeCheck::Within => {}
            DateRangeCheck::Before => return Err(Rejection::BeforeDateRange),
            DateRangeCheck::After => return Err(Rejection::AfterDateRange),
        }
    }

    if let Some(schedule) = rule.schedule() {
        match schedule.check(now) {
            ScheduleCheck::Active => {}
            ScheduleCheck::InactiveWeekday => return Err(Rejection::InactiveWeekday),
            ScheduleCheck::OutsideWindow => return Err(Rejection::OutsideScheduleWindow),
            ScheduleCheck::Misconfigured => return Err(Rejection::ScheduleMisconfigured),
        }
    }

    Ok(())
}

/// Full eligibility check against the pre-discount cart subtotal.
///
/// # Errors
///
/// Returns the first failing check as a [`Rejection`].
pub fn check_eligibility(
    rule: &DiscountRule<'_>,
    context: &EvaluationContext,
    cart_subtotal: &Money<'_, Currency>,
) -> Result<(), Rejection> {
    check_temporal(rule, context)?;

    if let Some(minimum) = rule.minimum_spend()
        && cart_subtotal.to_minor_units() < minimum.to_minor_units()
    {
        return Err(Rejection::BelowMinimumSpend);
    }

    Ok(())
}
