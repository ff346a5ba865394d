//! Rule Normalization
//!
//! Turns a persisted [`DiscountRecord`] into a canonical [`DiscountRule`], or explains
//! why it cannot be used.

use std::num::NonZeroU32;

use jiff::{Timestamp, civil::Weekday};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    categories::CategorySet,
    rules::{
        AmountType, Application, DiscountRule, DiscountValue, Mode, QuantityRule, RewardTargets,
        record::{DiscountRecord, ScheduleDaysRecord},
        schedule::{DateRange, Schedule, WeekdaySet, parse_clock, parse_date},
        targets::Targets,
    },
};

/// Reasons a persisted rule cannot be evaluated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// The rule has no id.
    #[error("rule has no id")]
    MissingId,

    /// The rule has a blank name.
    #[error("rule name is empty")]
    EmptyName,

    /// `amountType` is absent.
    #[error("amountType is missing")]
    MissingAmountType,

    /// `amountType` is not a known value.
    #[error("unknown amountType {0:?}")]
    UnknownAmountType(String),

    /// A percentage or fixed rule has no `amount`.
    #[error("amount is required for {0} rules")]
    MissingAmount(AmountType),

    /// A monetary or percentage field is negative.
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// A monetary field is not a whole number of minor units.
    #[error("{0} must be a whole number of minor units")]
    FractionalMinorUnits(&'static str),

    /// A monetary field does not fit in minor units.
    #[error("{0} is out of range")]
    OutOfRange(&'static str),

    /// An automatic rule has no `discountApplyTo`.
    #[error("discountApplyTo is required for automatic rules")]
    MissingApplyTo,

    /// `discountApplyTo` is not a known value.
    #[error("unknown discountApplyTo {0:?}")]
    UnknownApplyTo(String),

    /// A quantity rule has no `quantityRuleType`.
    #[error("quantityRuleType is required for quantity rules")]
    MissingQuantityRuleType,

    /// `quantityRuleType` is not a known value.
    #[error("unknown quantityRuleType {0:?}")]
    UnknownQuantityRuleType(String),

    /// `purchaseQuantity` is absent or below one.
    #[error("purchaseQuantity must be at least 1, got {0:?}")]
    InvalidPurchaseQuantity(Option<i64>),

    /// BOGO `discountQuantity` is absent or below one.
    #[error("discountQuantity must be at least 1, got {0:?}")]
    InvalidDiscountQuantity(Option<i64>),

    /// A scheduled rule is missing its start or end time.
    #[error("scheduled rules need both scheduleTimeStart and scheduleTimeEnd")]
    MissingScheduleTime,

    /// A schedule time could not be parsed.
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    /// A date range bound could not be parsed.
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// `createdAt` could not be parsed.
    #[error("invalid createdAt {0:?}")]
    InvalidTimestamp(String),
}

/// Normalize a persisted record into a canonical rule priced in `currency`.
///
/// Optional collections default to empty. A maximum value on a non-percentage rule is
/// dropped, as are minimum spend and maximum value flags set without a value. A schedule
/// whose start is after its end is kept and rejected during eligibility.
///
/// # Errors
///
/// Returns a [`RuleError`] describing the first problem found.
pub fn normalize<'a>(
    record: &DiscountRecord,
    currency: &'a Currency,
) -> Result<DiscountRule<'a>, RuleError> {
    if record.id.trim().is_empty() {
        return Err(RuleError::MissingId);
    }

    if record.name.trim().is_empty() {
        return Err(RuleError::EmptyName);
    }

    let value = discount_value(record, currency)?;
    let mode = mode(record)?;

    let mut rule = DiscountRule::new(record.id.clone(), record.name.clone(), value, mode);

    if record.set_schedule {
        rule = rule.with_schedule(schedule(record)?);
    }

    if record.set_date_range {
        rule = rule.with_date_range(DateRange::new(
            optional_date(record.date_range_start.as_deref())?,
            optional_date(record.date_range_end.as_deref())?,
        ));
    }

    if record.set_minimum_spend
        && let Some(minimum) = record.minimum_subtotal
    {
        let minimum = to_minor("minimumSubtotal", minimum)?;

        rule = rule.with_minimum_spend(Money::from_minor(minimum, currency));
    }

    if let Some(created_at) = record.created_at.as_deref() {
        let timestamp = created_at
            .trim()
            .parse::<Timestamp>()
            .map_err(|_parse| RuleError::InvalidTimestamp(created_at.to_string()))?;

        rule = rule.with_created_at(timestamp);
    }

    Ok(rule)
}

fn discount_value<'a>(
    record: &DiscountRecord,
    currency: &'a Currency,
) -> Result<DiscountValue<'a>, RuleError> {
    let amount_type = record
        .amount_type
        .as_deref()
        .ok_or(RuleError::MissingAmountType)?
        .parse::<AmountType>()
        .map_err(RuleError::UnknownAmountType)?;

    let cap = if record.set_maximum_value
        && let Some(maximum) = record.maximum_value
    {
        Some(Money::from_minor(to_minor("maximumValue", maximum)?, currency))
    } else {
        None
    };

    match amount_type {
        AmountType::Percentage => {
            let points = record
                .amount
                .ok_or(RuleError::MissingAmount(amount_type))?;

            if points.is_sign_negative() && !points.is_zero() {
                return Err(RuleError::Negative("amount"));
            }

            Ok(DiscountValue::Percentage { points, cap })
        }
        AmountType::Fixed => {
            let amount = record
                .amount
                .ok_or(RuleError::MissingAmount(amount_type))?;

            Ok(DiscountValue::Fixed(Money::from_minor(
                to_minor("amount", amount)?,
                currency,
            )))
        }
        AmountType::VariablePercentage => Ok(DiscountValue::VariablePercentage { cap }),
        AmountType::VariableAmount => Ok(DiscountValue::VariableAmount),
    }
}

fn mode(record: &DiscountRecord) -> Result<Mode, RuleError> {
    if !record.automatic_discount {
        return Ok(Mode::Manual);
    }

    let purchase = purchase_targets(record);

    let application = match record.discount_apply_to.as_deref() {
        None => return Err(RuleError::MissingApplyTo),
        Some("item_category") => Application::ItemCategory { purchase },
        Some("quantity") => Application::Quantity {
            purchase,
            rule: quantity_rule(record)?,
        },
        Some(other) => return Err(RuleError::UnknownApplyTo(other.to_string())),
    };

    Ok(Mode::Automatic(application))
}

fn quantity_rule(record: &DiscountRecord) -> Result<QuantityRule, RuleError> {
    let rule_type = record
        .quantity_rule_type
        .as_deref()
        .ok_or(RuleError::MissingQuantityRuleType)?;

    let purchase_quantity = positive(record.purchase_quantity)
        .ok_or(RuleError::InvalidPurchaseQuantity(record.purchase_quantity))?;

    match rule_type {
        "exact" => Ok(QuantityRule::Exact(purchase_quantity)),
        "minimum" => Ok(QuantityRule::Minimum(purchase_quantity)),
        "bogo" => {
            let get = positive(record.discount_quantity)
                .ok_or(RuleError::InvalidDiscountQuantity(record.discount_quantity))?;

            Ok(QuantityRule::Bogo {
                buy: purchase_quantity,
                get,
                reward: reward_targets(record),
            })
        }
        other => Err(RuleError::UnknownQuantityRuleType(other.to_string())),
    }
}

fn purchase_targets(record: &DiscountRecord) -> Targets {
    if record.add_all_items_to_purchase {
        return Targets::all();
    }

    Targets::new(
        record.purchase_items.iter().cloned(),
        record.purchase_categories.iter().cloned().collect::<CategorySet>(),
    )
}

fn reward_targets(record: &DiscountRecord) -> RewardTargets {
    if record.copy_eligible_items {
        return RewardTargets::SameAsPurchase;
    }

    if record.add_all_items_to_discount {
        return RewardTargets::Targets(Targets::all());
    }

    RewardTargets::Targets(Targets::new(
        record.discount_target_items.iter().cloned(),
        record
            .discount_target_categories
            .iter()
            .cloned()
            .collect::<CategorySet>(),
    ))
}

fn schedule(record: &DiscountRecord) -> Result<Schedule, RuleError> {
    let (Some(start), Some(end)) = (
        record.schedule_time_start.as_deref(),
        record.schedule_time_end.as_deref(),
    ) else {
        return Err(RuleError::MissingScheduleTime);
    };

    let start = parse_clock(start).ok_or_else(|| RuleError::InvalidTime(start.to_string()))?;
    let end = parse_clock(end).ok_or_else(|| RuleError::InvalidTime(end.to_string()))?;

    Ok(Schedule::new(weekdays(record.schedule_days), start, end))
}

fn weekdays(days: ScheduleDaysRecord) -> WeekdaySet {
    [
        (days.monday, Weekday::Monday),
        (days.tuesday, Weekday::Tuesday),
        (days.wednesday, Weekday::Wednesday),
        (days.thursday, Weekday::Thursday),
        (days.friday, Weekday::Friday),
        (days.saturday, Weekday::Saturday),
        (days.sunday, Weekday::Sunday),
    ]
    .into_iter()
    .filter(|(enabled, _day)| *enabled)
    .fold(WeekdaySet::NONE, |set, (_enabled, day)| set.with(day))
}

fn optional_date(value: Option<&str>) -> Result<Option<jiff::civil::Date>, RuleError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| RuleError::InvalidDate(value.to_string())),
    }
}

fn positive(value: Option<i64>) -> Option<NonZeroU32> {
    value
        .and_then(|value| u32::try_from(value).ok())
        .and_then(NonZeroU32::new)
}

fn to_minor(field: &'static str, value: Decimal) -> Result<i64, RuleError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RuleError::Negative(field));
    }

    if !value.fract().is_zero() {
        return Err(RuleError::FractionalMinorUnits(field));
    }

    value.to_i64().ok_or(RuleError::OutOfRange(field))
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn automatic(amount_type: &str, amount: Option<i64>, apply_to: &str) -> DiscountRecord {
        DiscountRecord {
            id: "rule".to_string(),
            name: "Rule".to_string(),
            amount_type: Some(amount_type.to_string()),
            amount: amount.map(Decimal::from),
            automatic_discount: true,
            discount_apply_to: Some(apply_to.to_string()),
            ..DiscountRecord::default()
        }
    }

    #[test]
    fn normalizes_item_category_percentage() -> TestResult {
        let mut record = automatic("percentage", Some(15), "item_category");
        record.purchase_categories = vec!["drinks".to_string()];

        let rule = normalize(&record, USD)?;

        assert_eq!(
            rule.value(),
            &DiscountValue::Percentage {
                points: Decimal::from(15),
                cap: None
            }
        );
        assert_eq!(
            rule.application(),
            Some(&Application::ItemCategory {
                purchase: Targets::categories(&["drinks"])
            })
        );

        Ok(())
    }

    #[test]
    fn missing_amount_type_is_rejected() {
        let mut record = automatic("percentage", Some(15), "item_category");
        record.amount_type = None;

        assert_eq!(normalize(&record, USD), Err(RuleError::MissingAmountType));
    }

    #[test]
    fn automatic_rule_without_apply_to_is_rejected() {
        let mut record = automatic("fixed", Some(500), "item_category");
        record.discount_apply_to = None;

        assert_eq!(normalize(&record, USD), Err(RuleError::MissingApplyTo));
    }

    #[test]
    fn manual_rule_ignores_apply_to() -> TestResult {
        let mut record = automatic("fixed", Some(500), "item_category");
        record.automatic_discount = false;
        record.discount_apply_to = None;

        let rule = normalize(&record, USD)?;

        assert_eq!(rule.mode(), &Mode::Manual);

        Ok(())
    }

    #[test]
    fn negative_amount_is_rejected() {
        let record = automatic("fixed", Some(-1), "item_category");

        assert_eq!(normalize(&record, USD), Err(RuleError::Negative("amount")));
    }

    #[test]
    fn fractional_fixed_amount_is_rejected() {
        let mut record = automatic("fixed", None, "item_category");
        record.amount = Some(Decimal::new(15, 1));

        assert_eq!(
            normalize(&record, USD),
            Err(RuleError::FractionalMinorUnits("amount"))
        );
    }

    #[test]
    fn variable_rules_need_no_amount() -> TestResult {
        let record = automatic("variable_amount", None, "item_category");

        assert_eq!(normalize(&record, USD)?.value(), &DiscountValue::VariableAmount);

        Ok(())
    }

    #[test]
    fn percentage_keeps_cap_and_fixed_drops_it() -> TestResult {
        let mut percentage = automatic("percentage", Some(50), "item_category");
        percentage.set_maximum_value = true;
        percentage.maximum_value = Some(Decimal::from(1_000));

        assert_eq!(
            normalize(&percentage, USD)?.value(),
            &DiscountValue::Percentage {
                points: Decimal::from(50),
                cap: Some(Money::from_minor(1_000, USD))
            }
        );

        let mut fixed = automatic("fixed", Some(500), "item_category");
        fixed.set_maximum_value = true;
        fixed.maximum_value = Some(Decimal::from(100));

        assert_eq!(
            normalize(&fixed, USD)?.value(),
            &DiscountValue::Fixed(Money::from_minor(500, USD))
        );

        Ok(())
    }

    #[test]
    fn bogo_with_copy_eligible_reuses_purchase_targets() -> TestResult {
        let mut record = automatic("percentage", Some(100), "quantity");
        record.quantity_rule_type = Some("bogo".to_string());
        record.purchase_quantity = Some(2);
        record.discount_quantity = Some(1);
        record.copy_eligible_items = true;
        record.discount_target_items = vec!["ignored".to_string()];

        let rule = normalize(&record, USD)?;

        let Some(Application::Quantity {
            rule: QuantityRule::Bogo { buy, get, reward },
            ..
        }) = rule.application()
        else {
            panic!("expected a BOGO rule, got {:?}", rule.application());
        };

        assert_eq!(buy.get(), 2);
        assert_eq!(get.get(), 1);
        assert_eq!(reward, &RewardTargets::SameAsPurchase);

        Ok(())
    }

    #[test]
    fn bogo_requires_discount_quantity() {
        let mut record = automatic("percentage", Some(100), "quantity");
        record.quantity_rule_type = Some("bogo".to_string());
        record.purchase_quantity = Some(2);
        record.discount_quantity = Some(0);

        assert_eq!(
            normalize(&record, USD),
            Err(RuleError::InvalidDiscountQuantity(Some(0)))
        );
    }

    #[test]
    fn quantity_rule_requires_positive_purchase_quantity() {
        let mut record = automatic("fixed", Some(500), "quantity");
        record.quantity_rule_type = Some("exact".to_string());

        assert_eq!(
            normalize(&record, USD),
            Err(RuleError::InvalidPurchaseQuantity(None))
        );
    }

    #[test]
    fn unknown_quantity_rule_type_is_rejected() {
        let mut record = automatic("fixed", Some(500), "quantity");
        record.quantity_rule_type = Some("bulk".to_string());
        record.purchase_quantity = Some(3);

        assert_eq!(
            normalize(&record, USD),
            Err(RuleError::UnknownQuantityRuleType("bulk".to_string()))
        );
    }

    #[test]
    fn schedule_and_date_range_are_parsed() -> TestResult {
        let mut record = automatic("percentage", Some(10), "item_category");
        record.add_all_items_to_purchase = true;
        record.set_schedule = true;
        record.schedule_days.monday = true;
        record.schedule_days.friday = true;
        record.schedule_time_start = Some("09:00".to_string());
        record.schedule_time_end = Some("17:00".to_string());
        record.set_date_range = true;
        record.date_range_start = Some("2024-03-01".to_string());

        let rule = normalize(&record, USD)?;

        let schedule = rule.schedule().ok_or("missing schedule")?;

        assert!(schedule.days().contains(Weekday::Monday));
        assert!(schedule.days().contains(Weekday::Friday));
        assert!(!schedule.days().contains(Weekday::Sunday));
        assert_eq!(schedule.start(), time(9, 0, 0, 0));
        assert_eq!(schedule.end(), time(17, 0, 0, 0));
        assert_eq!(
            rule.date_range(),
            Some(&DateRange::new(Some(date(2024, 3, 1)), None))
        );

        Ok(())
    }

    #[test]
    fn schedule_without_times_is_rejected() {
        let mut record = automatic("percentage", Some(10), "item_category");
        record.set_schedule = true;
        record.schedule_time_start = Some("09:00".to_string());

        assert_eq!(normalize(&record, USD), Err(RuleError::MissingScheduleTime));
    }

    #[test]
    fn minimum_spend_flag_without_value_is_ignored() -> TestResult {
        let mut record = automatic("percentage", Some(10), "item_category");
        record.set_minimum_spend = true;

        assert!(normalize(&record, USD)?.minimum_spend().is_none());

        record.minimum_subtotal = Some(Decimal::from(5_000));

        assert_eq!(
            normalize(&record, USD)?.minimum_spend(),
            Some(&Money::from_minor(5_000, USD))
        );

        Ok(())
    }

    #[test]
    fn created_at_is_parsed() -> TestResult {
        let mut record = automatic("percentage", Some(10), "item_category");
        record.created_at = Some("2024-01-01T12:00:00Z".to_string());

        assert!(normalize(&record, USD)?.created_at().is_some());

        record.created_at = Some("yesterday".to_string());

        assert_eq!(
            normalize(&record, USD),
            Err(RuleError::InvalidTimestamp("yesterday".to_string()))
        );

        Ok(())
    }
}
