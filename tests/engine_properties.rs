//! Integration tests for engine-wide guarantees: one discount per cart, caps,
//! non-negative totals, rejection order and schedule window boundaries.

use jiff::civil::{DateTime, date};
use rust_decimal::Decimal;
use rusty_money::iso::USD;
use testresult::TestResult;

use carte::{
    cart::{CartLineRecord, CartSnapshot},
    context::EvaluationContext,
    eligibility::Rejection,
    engine::DiscountEngine,
    result::{DiscountResult, OutcomeStatus},
    rules::{DiscountRule, record::DiscountRecord},
};

fn rule(id: &str, amount_type: &str, amount: i64) -> DiscountRecord {
    DiscountRecord {
        id: id.to_string(),
        name: id.to_string(),
        amount_type: Some(amount_type.to_string()),
        amount: Some(Decimal::from(amount)),
        automatic_discount: true,
        discount_apply_to: Some("item_category".to_string()),
        add_all_items_to_purchase: true,
        ..DiscountRecord::default()
    }
}

fn line(key: &str, unit_price: i64, quantity: u32) -> CartLineRecord {
    CartLineRecord {
        group_key: key.to_string(),
        item_id: key.to_string(),
        category_ids: vec!["mains".to_string()],
        unit_price,
        quantity,
    }
}

fn run(
    records: &[DiscountRecord],
    lines: Vec<CartLineRecord>,
    at: DateTime,
) -> Result<DiscountResult<'static>, Box<dyn std::error::Error>> {
    let engine = DiscountEngine::from_records(records, USD);
    let cart = CartSnapshot::from_records(lines, USD)?;

    Ok(engine.calculate(&cart, &EvaluationContext::at_local(at))?)
}

fn monday(hour: i8, minute: i8) -> DateTime {
    date(2024, 1, 1).at(hour, minute, 0, 0)
}

#[test]
fn only_the_largest_discount_is_applied() -> TestResult {
    let records = [
        rule("five-percent", "percentage", 5),
        rule("three-off", "fixed", 300),
        rule("twenty-percent", "percentage", 20),
        rule("ten-off", "fixed", 1_000),
    ];

    let result = run(
        &records,
        vec![line("steak", 3_000, 1), line("salad", 1_000, 1)],
        monday(12, 0),
    )?;

    assert_eq!(result.applied_discounts().len(), 1);
    assert_eq!(
        result.applied_discounts().first().map(DiscountRule::id),
        Some("ten-off")
    );
    assert_eq!(result.total_discount().to_minor_units(), 1_000);

    let applied = result
        .breakdown()
        .iter()
        .filter(|outcome| matches!(outcome.status, OutcomeStatus::Applied { .. }))
        .count();

    assert_eq!(applied, 1);

    Ok(())
}

#[test]
fn percentage_discounts_respect_their_cap() -> TestResult {
    let mut capped = rule("half-off", "percentage", 50);
    capped.set_maximum_value = true;
    capped.maximum_value = Some(Decimal::from(1_000));

    let result = run(&[capped], vec![line("feast", 10_000, 1)], monday(12, 0))?;

    assert_eq!(result.total_discount().to_minor_units(), 1_000);
    assert_eq!(result.total().to_minor_units(), 9_000);

    Ok(())
}

#[test]
fn fixed_discount_larger_than_the_cart_leaves_a_zero_total() -> TestResult {
    let result = run(
        &[rule("fifty-off", "fixed", 5_000)],
        vec![line("soup", 600, 1), line("bread", 400, 1)],
        monday(12, 0),
    )?;

    assert_eq!(result.total_discount().to_minor_units(), 1_000);
    assert_eq!(result.total().to_minor_units(), 0);

    for item in result.item_discounts().values() {
        assert!(item.discount_amount().to_minor_units() >= 0);
        assert!(item.discount_percentage() <= Decimal::ONE_HUNDRED);
    }

    Ok(())
}

#[test]
fn line_discounts_add_up_to_the_total_discount() -> TestResult {
    let result = run(
        &[rule("ten-off", "fixed", 1_000)],
        vec![line("a", 333, 1), line("b", 333, 1), line("c", 334, 2)],
        monday(12, 0),
    )?;

    let spread: i64 = result
        .item_discounts()
        .values()
        .map(|item| item.discount_amount().to_minor_units())
        .sum();

    assert_eq!(spread, result.total_discount().to_minor_units());

    Ok(())
}

#[test]
fn equal_discounts_prefer_the_earliest_created_rule() -> TestResult {
    let mut newer = rule("newer", "fixed", 500);
    newer.created_at = Some("2024-02-01T00:00:00Z".to_string());

    let mut older = rule("older", "fixed", 500);
    older.created_at = Some("2024-01-01T00:00:00Z".to_string());

    let result = run(&[newer, older], vec![line("pie", 2_000, 1)], monday(12, 0))?;

    assert_eq!(
        result.applied_discounts().first().map(DiscountRule::id),
        Some("older")
    );

    Ok(())
}

fn office_hours() -> DiscountRecord {
    let mut record = rule("office-hours", "fixed", 100);

    record.set_schedule = true;
    record.schedule_days.monday = true;
    record.schedule_time_start = Some("09:00".to_string());
    record.schedule_time_end = Some("17:00".to_string());

    record
}

#[test]
fn schedule_window_includes_both_ends() -> TestResult {
    for at in [monday(9, 0), monday(12, 30), monday(17, 0)] {
        let result = run(&[office_hours()], vec![line("tea", 300, 1)], at)?;

        assert_eq!(result.total_discount().to_minor_units(), 100, "at {at}");
    }

    Ok(())
}

#[test]
fn schedule_window_excludes_outside_times_and_days() -> TestResult {
    let cases = [
        (monday(8, 59), Rejection::OutsideScheduleWindow),
        (monday(17, 1), Rejection::OutsideScheduleWindow),
        (date(2024, 1, 2).at(12, 0, 0, 0), Rejection::InactiveWeekday),
    ];

    for (at, reason) in cases {
        let result = run(&[office_hours()], vec![line("tea", 300, 1)], at)?;

        assert_eq!(result.total_discount().to_minor_units(), 0, "at {at}");
        assert_eq!(
            result.breakdown().first().map(|outcome| &outcome.status),
            Some(&OutcomeStatus::Ineligible { reason }),
            "at {at}"
        );
    }

    Ok(())
}

fn first_status<'r>(result: &'r DiscountResult<'_>) -> Option<&'r OutcomeStatus> {
    result.breakdown().first().map(|outcome| &outcome.status)
}

#[test]
fn manual_rules_report_not_automatic_before_their_date_range() -> TestResult {
    let mut record = rule("expired-coupon", "fixed", 100);

    record.automatic_discount = false;
    record.set_date_range = true;
    record.date_range_end = Some("2023-12-31".to_string());

    let result = run(&[record], vec![line("tea", 300, 1)], monday(12, 0))?;

    assert_eq!(
        first_status(&result),
        Some(&OutcomeStatus::Ineligible {
            reason: Rejection::NotAutomatic
        })
    );

    Ok(())
}

#[test]
fn schedule_is_reported_before_minimum_spend() -> TestResult {
    let mut tuesday_only = rule("big-tuesday", "fixed", 100);

    tuesday_only.set_schedule = true;
    tuesday_only.schedule_days.tuesday = true;
    tuesday_only.schedule_time_start = Some("09:00".to_string());
    tuesday_only.schedule_time_end = Some("17:00".to_string());
    tuesday_only.set_minimum_spend = true;
    tuesday_only.minimum_subtotal = Some(Decimal::from(99_999));

    let result = run(
        std::slice::from_ref(&tuesday_only),
        vec![line("tea", 100, 1)],
        monday(12, 0),
    )?;

    assert_eq!(
        first_status(&result),
        Some(&OutcomeStatus::Ineligible {
            reason: Rejection::InactiveWeekday
        })
    );

    let result = run(&[tuesday_only], vec![line("tea", 100, 1)], monday(18, 0))?;

    assert_eq!(
        first_status(&result),
        Some(&OutcomeStatus::Ineligible {
            reason: Rejection::InactiveWeekday
        })
    );

    Ok(())
}

#[test]
fn schedule_window_is_reported_before_minimum_spend() -> TestResult {
    let mut record = office_hours();

    record.set_minimum_spend = true;
    record.minimum_subtotal = Some(Decimal::from(99_999));

    let result = run(&[record], vec![line("tea", 100, 1)], monday(18, 0))?;

    assert_eq!(
        first_status(&result),
        Some(&OutcomeStatus::Ineligible {
            reason: Rejection::OutsideScheduleWindow
        })
    );

    Ok(())
}

#[test]
fn variable_percentage_respects_its_cap() -> TestResult {
    let record = DiscountRecord {
        amount: None,
        set_maximum_value: true,
        maximum_value: Some(Decimal::from(700)),
        ..rule("manager-discount", "variable_percentage", 0)
    };

    let engine = DiscountEngine::from_records([&record], USD);
    let cart = CartSnapshot::from_records([line("feast", 10_000, 1)], USD)?;
    let context = EvaluationContext::at_local(monday(12, 0)).with_variable_amounts(
        [("manager-discount", Decimal::from(50))]
            .into_iter()
            .collect(),
    );

    let result = engine.calculate(&cart, &context)?;

    assert_eq!(result.total_discount().to_minor_units(), 700);
    assert_eq!(result.total().to_minor_units(), 9_300);

    Ok(())
}

#[test]
fn bogo_never_gives_away_the_unit_that_was_bought() -> TestResult {
    let record = DiscountRecord {
        id: "burger-then-anything".to_string(),
        name: "Buy a burger, get anything free".to_string(),
        amount_type: Some("percentage".to_string()),
        amount: Some(Decimal::from(100)),
        automatic_discount: true,
        discount_apply_to: Some("quantity".to_string()),
        quantity_rule_type: Some("bogo".to_string()),
        purchase_quantity: Some(1),
        discount_quantity: Some(1),
        purchase_items: vec!["burger".to_string()],
        add_all_items_to_discount: true,
        ..DiscountRecord::default()
    };

    let alone = run(
        std::slice::from_ref(&record),
        vec![line("burger", 1_500, 1)],
        monday(12, 0),
    )?;

    assert_eq!(alone.total_discount().to_minor_units(), 0);
    assert_eq!(alone.total().to_minor_units(), 1_500);
    assert_eq!(first_status(&alone), Some(&OutcomeStatus::NoMatch));

    let with_fries = run(
        &[record],
        vec![line("burger", 1_500, 1), line("fries", 400, 1)],
        monday(12, 0),
    )?;

    assert_eq!(with_fries.total_discount().to_minor_units(), 400);
    assert!(with_fries.item_discount("burger").is_none());

    Ok(())
}
