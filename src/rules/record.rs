//! Discount Records
//!
//! The persisted shape of a discount rule as written by the admin screens. Every
//! field except `id` may be missing, and enum-like fields stay as strings, so one
//! malformed rule never prevents the rest of the rule set from loading.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted discount rule, prior to normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "mirrors the persisted admin form flags"
)]
pub struct DiscountRecord {
    /// Rule id
    pub id: String,

    /// Display name
    pub name: String,

    /// `percentage`, `fixed`, `variable_amount` or `variable_percentage`
    pub amount_type: Option<String>,

    /// Percentage points for percentage rules, minor units for fixed rules
    pub amount: Option<Decimal>,

    /// Applied without a coupon code
    pub automatic_discount: bool,

    /// `item_category` or `quantity`
    pub discount_apply_to: Option<String>,

    /// Purchase-target category ids
    pub purchase_categories: Vec<String>,

    /// Purchase-target item ids
    pub purchase_items: Vec<String>,

    /// Every item counts as a purchase target
    pub add_all_items_to_purchase: bool,

    /// `exact`, `minimum` or `bogo`
    pub quantity_rule_type: Option<String>,

    /// Units required by a quantity rule
    pub purchase_quantity: Option<i64>,

    /// Units granted per BOGO group
    pub discount_quantity: Option<i64>,

    /// BOGO reward category ids
    pub discount_target_categories: Vec<String>,

    /// BOGO reward item ids
    pub discount_target_items: Vec<String>,

    /// Every item is a BOGO reward target
    pub add_all_items_to_discount: bool,

    /// BOGO rewards mirror the purchase targets
    pub copy_eligible_items: bool,

    /// Restrict the rule to a weekly schedule
    pub set_schedule: bool,

    /// Weekdays the schedule is active on
    pub schedule_days: ScheduleDaysRecord,

    /// Schedule start, `HH:MM` restaurant-local
    pub schedule_time_start: Option<String>,

    /// Schedule end, `HH:MM` restaurant-local
    pub schedule_time_end: Option<String>,

    /// Restrict the rule to a date range
    pub set_date_range: bool,

    /// First active date, `YYYY-MM-DD`
    pub date_range_start: Option<String>,

    /// Last active date, `YYYY-MM-DD`
    pub date_range_end: Option<String>,

    /// Require a minimum cart subtotal
    pub set_minimum_spend: bool,

    /// Minimum cart subtotal in minor units
    pub minimum_subtotal: Option<Decimal>,

    /// Cap percentage discounts
    pub set_maximum_value: bool,

    /// Discount cap in minor units
    pub maximum_value: Option<Decimal>,

    /// RFC 3339 creation timestamp, used to break ties
    pub created_at: Option<String>,
}

/// Weekday flags of a scheduled rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "mirrors the persisted per-day flags"
)]
pub struct ScheduleDaysRecord {
    /// Active on Monday
    #[serde(alias = "mon")]
    pub monday: bool,
    /// Active on Tuesday
    #[serde(alias = "tue")]
    pub tuesday: bool,
    /// Active on Wednesday
    #[serde(alias = "wed")]
    pub wednesday: bool,
    /// Active on Thursday
    #[serde(alias = "thu")]
    pub thursday: bool,
    /// Active on Friday
    #[serde(alias = "fri")]
    pub friday: bool,
    /// Active on Saturday
    #[serde(alias = "sat")]
    pub saturday: bool,
    /// Active on Sunday
    #[serde(alias = "sun")]
    pub sunday: bool,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_camel_case_json_with_missing_fields() -> TestResult {
        let record: DiscountRecord = serde_json::from_str(
            r#"{
                "id": "happy-hour",
                "name": "Happy Hour",
                "amountType": "percentage",
                "amount": 20,
                "automaticDiscount": true,
                "discountApplyTo": "item_category",
                "purchaseCategories": ["drinks"],
                "setSchedule": true,
                "scheduleDays": { "mon": true, "friday": true },
                "scheduleTimeStart": "16:00",
                "scheduleTimeEnd": "18:00"
            }"#,
        )?;

        assert_eq!(record.amount, Some(Decimal::from(20)));
        assert_eq!(record.purchase_categories, vec!["drinks".to_string()]);
        assert!(record.purchase_items.is_empty());
        assert!(record.schedule_days.monday);
        assert!(record.schedule_days.friday);
        assert!(!record.schedule_days.sunday);
        assert!(!record.set_date_range);
        assert_eq!(record.quantity_rule_type, None);

        Ok(())
    }

    #[test]
    fn deserializes_from_yaml() -> TestResult {
        let record: DiscountRecord = serde_norway::from_str(
            "
id: bogo-drinks
name: Buy 2 drinks, 1 free
amountType: percentage
amount: 100
automaticDiscount: true
discountApplyTo: quantity
quantityRuleType: bogo
purchaseQuantity: 2
discountQuantity: 1
copyEligibleItems: true
purchaseCategories: [drinks]
",
        )?;

        assert_eq!(record.purchase_quantity, Some(2));
        assert_eq!(record.discount_quantity, Some(1));
        assert!(record.copy_eligible_items);

        Ok(())
    }
}
