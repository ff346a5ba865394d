//! Discount Responses

use jiff::civil::Weekday;
use rust_decimal::prelude::ToPrimitive;
use rusty_money::Money;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use carte::{
    engine::LoadedRule,
    rules::{Application, DiscountRule, DiscountValue, QuantityRule, record::DiscountRecord},
};

const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Monday, "monday"),
    (Weekday::Tuesday, "tuesday"),
    (Weekday::Wednesday, "wednesday"),
    (Weekday::Thursday, "thursday"),
    (Weekday::Friday, "friday"),
    (Weekday::Saturday, "saturday"),
    (Weekday::Sunday, "sunday"),
];

/// Weekly schedule of a rule, restaurant-local.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ScheduleResponse {
    /// Active weekdays, lowercase
    pub days: Vec<String>,

    /// Window start, `HH:MM`
    pub start: String,

    /// Window end, `HH:MM`, inclusive
    pub end: String,
}

/// A normalized automatic discount rule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActiveDiscountResponse {
    /// Rule id
    pub id: String,

    /// Display name
    pub name: String,

    /// `percentage`, `fixed`, `variable_amount` or `variable_percentage`
    pub amount_type: String,

    /// Percentage points, for percentage rules
    pub percentage: Option<f64>,

    /// Discount in minor units, for fixed rules
    pub amount: Option<i64>,

    /// Maximum discount in minor units
    pub maximum_value: Option<i64>,

    /// Minimum cart subtotal in minor units
    pub minimum_subtotal: Option<i64>,

    /// `item_category` or `quantity`
    pub discount_apply_to: String,

    /// `exact`, `minimum` or `bogo`, for quantity rules
    pub quantity_rule_type: Option<String>,

    /// Weekly schedule
    pub schedule: Option<ScheduleResponse>,

    /// First active date, `YYYY-MM-DD`
    pub date_range_start: Option<String>,

    /// Last active date, `YYYY-MM-DD`
    pub date_range_end: Option<String>,
}

impl From<&DiscountRule<'_>> for ActiveDiscountResponse {
    fn from(rule: &DiscountRule<'_>) -> Self {
        let (percentage, amount, maximum_value) = match rule.value() {
            DiscountValue::Percentage { points, cap } => (
                points.to_f64(),
                None,
                cap.map(|cap| cap.to_minor_units()),
            ),
            DiscountValue::Fixed(amount) => (None, Some(amount.to_minor_units()), None),
            DiscountValue::VariablePercentage { cap } => {
                (None, None, cap.map(|cap| cap.to_minor_units()))
            }
            DiscountValue::VariableAmount => (None, None, None),
        };

        let (discount_apply_to, quantity_rule_type) = match rule.application() {
            Some(Application::Quantity { rule, .. }) => (
                "quantity",
                Some(match rule {
                    QuantityRule::Exact(_) => "exact",
                    QuantityRule::Minimum(_) => "minimum",
                    QuantityRule::Bogo { .. } => "bogo",
                }),
            ),
            Some(Application::ItemCategory { .. }) | None => ("item_category", None),
        };

        let schedule = rule.schedule().map(|schedule| ScheduleResponse {
            days: WEEKDAYS
                .iter()
                .filter(|(day, _)| schedule.days().contains(*day))
                .map(|(_, name)| (*name).to_string())
                .collect(),
            start: schedule.start().strftime("%H:%M").to_string(),
            end: schedule.end().strftime("%H:%M").to_string(),
        });

        let date_range = rule.date_range();

        Self {
            id: rule.id().to_string(),
            name: rule.name().to_string(),
            amount_type: rule.value().amount_type().to_string(),
            percentage,
            amount,
            maximum_value,
            minimum_subtotal: rule.minimum_spend().map(Money::to_minor_units),
            discount_apply_to: discount_apply_to.to_string(),
            quantity_rule_type: quantity_rule_type.map(ToString::to_string),
            schedule,
            date_range_start: date_range
                .and_then(|range| range.start())
                .map(|date| date.to_string()),
            date_range_end: date_range
                .and_then(|range| range.end())
                .map(|date| date.to_string()),
        }
    }
}

/// A persisted rule as listed for admins, with its normalization status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscountListItem {
    /// Rule id
    pub id: String,

    /// Display name
    pub name: String,

    /// Raw amount type
    pub amount_type: Option<String>,

    /// Raw amount, percentage points or minor units
    pub amount: Option<String>,

    /// Applied without a coupon code
    pub automatic_discount: bool,

    /// Raw apply-to target
    pub discount_apply_to: Option<String>,

    /// Raw quantity rule type
    pub quantity_rule_type: Option<String>,

    /// Restricted to a weekly schedule
    pub set_schedule: bool,

    /// Restricted to a date range
    pub set_date_range: bool,

    /// Gated on a minimum subtotal
    pub set_minimum_spend: bool,

    /// Capped at a maximum value
    pub set_maximum_value: bool,

    /// RFC 3339 creation timestamp
    pub created_at: Option<String>,

    /// Whether the rule normalizes and takes part in calculations
    pub valid: bool,

    /// Why the rule is excluded from calculations
    pub error: Option<String>,
}

impl DiscountListItem {
    pub(crate) fn new(record: &DiscountRecord, loaded: &LoadedRule<'_>) -> Self {
        let error = match loaded {
            LoadedRule::Invalid { error, .. } => Some(error.to_string()),
            LoadedRule::Valid(_) => None,
        };

        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            amount_type: record.amount_type.clone(),
            amount: record.amount.map(|amount| amount.to_string()),
            automatic_discount: record.automatic_discount,
            discount_apply_to: record.discount_apply_to.clone(),
            quantity_rule_type: record.quantity_rule_type.clone(),
            set_schedule: record.set_schedule,
            set_date_range: record.set_date_range,
            set_minimum_spend: record.set_minimum_spend,
            set_maximum_value: record.set_maximum_value,
            created_at: record.created_at.clone(),
            valid: error.is_none(),
            error,
        }
    }
}

/// A page of persisted rules.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountsResponse {
    /// Rules on this page, in creation order
    pub discounts: Vec<DiscountListItem>,

    /// 1-based page number
    pub page: usize,

    /// Page size
    pub limit: usize,

    /// Rules matching the query across all pages
    pub total: usize,
}
