//! Checkout Requests

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use carte::{cart::CartLineRecord, context::VariableAmounts};

/// A cart line as submitted by the storefront or POS.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRequest {
    /// Key unique per distinct item + options combination
    pub group_key: String,

    /// Catalog item id
    pub item_id: String,

    /// Categories the item belongs to
    #[serde(default)]
    pub category_ids: Vec<String>,

    /// Unit price in minor units
    pub unit_price: i64,

    /// Number of units
    pub quantity: u32,
}

impl From<CartItemRequest> for CartLineRecord {
    fn from(item: CartItemRequest) -> Self {
        Self {
            group_key: item.group_key,
            item_id: item.item_id,
            category_ids: item.category_ids,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// An amount entered at the register for a variable rule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariableAmountRequest {
    /// Rule the amount is for
    pub rule_id: String,

    /// Minor units for `variable_amount`, percentage points for `variable_percentage`
    ///
    /// Accepts a JSON number or a decimal string.
    #[salvo(schema(value_type = f64))]
    pub value: Decimal,
}

pub(crate) fn variable_amounts(entries: Vec<VariableAmountRequest>) -> VariableAmounts {
    entries
        .into_iter()
        .map(|entry| (entry.rule_id, entry.value))
        .collect()
}

/// Calculate Discounts Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalculateDiscountsRequest {
    /// Restaurant whose rules apply
    pub restaurant_id: String,

    /// Cart lines, in cart order
    pub items: Vec<CartItemRequest>,

    /// Amounts for variable rules
    #[serde(default)]
    pub variable_amounts: Vec<VariableAmountRequest>,
}

/// Create Checkout Session Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionRequest {
    /// Restaurant whose rules apply
    pub restaurant_id: String,

    /// Cart lines, in cart order
    pub items: Vec<CartItemRequest>,

    /// Amounts for variable rules
    #[serde(default)]
    pub variable_amounts: Vec<VariableAmountRequest>,

    /// Discount total the client showed, in minor units
    #[serde(default)]
    pub client_total_discount: Option<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn variable_amounts_keep_every_decimal_place() -> TestResult {
        let entries: Vec<VariableAmountRequest> = serde_json::from_value(json!([
            { "ruleId": "staff", "value": 12.345 },
            { "ruleId": "comp", "value": 300 },
            { "ruleId": "manager", "value": "0.1" },
        ]))?;

        let amounts = variable_amounts(entries);

        assert_eq!(amounts.get("staff"), Some(Decimal::new(12_345, 3)));
        assert_eq!(amounts.get("comp"), Some(Decimal::from(300)));
        assert_eq!(amounts.get("manager"), Some(Decimal::new(1, 1)));

        Ok(())
    }

    #[test]
    fn non_numeric_variable_amounts_do_not_deserialize() {
        let result = serde_json::from_value::<VariableAmountRequest>(json!({
            "ruleId": "staff",
            "value": "lots",
        }));

        assert!(result.is_err());
    }
}
