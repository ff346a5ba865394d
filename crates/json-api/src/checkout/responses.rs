//! Checkout Responses

use rust_decimal::prelude::ToPrimitive;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use carte::result::RuleOutcome;

use super::Checkout;

/// The rule applied to the cart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppliedDiscountResponse {
    /// Rule id
    pub id: String,

    /// Display name
    pub name: String,

    /// `percentage`, `fixed`, `variable_amount` or `variable_percentage`
    pub amount_type: String,
}

/// Discount on one cart line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemDiscountResponse {
    /// Cart line group key
    pub group_key: String,

    /// Amount taken off the line, minor units
    pub discount_amount: i64,

    /// Share of the line subtotal, to two decimal places
    pub discount_percentage: f64,
}

/// What happened to one rule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleOutcomeResponse {
    /// Rule id
    pub rule_id: String,

    /// Rule display name
    pub rule_name: String,

    /// `invalid`, `ineligible`, `no_match`, `zero_amount`, `calculation_failed`,
    /// `superseded` or `applied`
    pub status: String,

    /// Why the rule was passed over
    pub reason: Option<String>,

    /// Discount the rule was worth, minor units
    pub amount: Option<i64>,
}

impl From<&RuleOutcome> for RuleOutcomeResponse {
    fn from(outcome: &RuleOutcome) -> Self {
        Self {
            rule_id: outcome.rule_id.clone(),
            rule_name: outcome.rule_name.clone(),
            status: outcome.status.code().to_string(),
            reason: outcome.status.reason(),
            amount: outcome.status.amount(),
        }
    }
}

/// Discount Result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscountResultResponse {
    /// ISO 4217 currency code
    pub currency: String,

    /// Pre-discount subtotal, minor units
    pub subtotal: i64,

    /// Discount applied, minor units
    pub total_discount: i64,

    /// Amount to charge, minor units
    pub total: i64,

    /// The winning rule, if any
    pub applied_discounts: Vec<AppliedDiscountResponse>,

    /// Per-line discounts, in cart order
    pub item_discounts: Vec<ItemDiscountResponse>,

    /// One entry per rule, in rule set order
    pub discount_breakdown: Vec<RuleOutcomeResponse>,
}

impl From<&Checkout> for DiscountResultResponse {
    fn from(checkout: &Checkout) -> Self {
        let result = &checkout.result;

        let item_discounts = checkout
            .cart
            .iter()
            .filter_map(|line| {
                let item = result.item_discount(line.group_key())?;

                Some(ItemDiscountResponse {
                    group_key: line.group_key().to_string(),
                    discount_amount: item.discount_amount().to_minor_units(),
                    discount_percentage: item.discount_percentage().to_f64().unwrap_or_default(),
                })
            })
            .collect();

        Self {
            currency: checkout.restaurant.currency.iso_alpha_code.to_string(),
            subtotal: result.subtotal().to_minor_units(),
            total_discount: result.total_discount().to_minor_units(),
            total: result.total().to_minor_units(),
            applied_discounts: result
                .applied_discounts()
                .iter()
                .map(|rule| AppliedDiscountResponse {
                    id: rule.id().to_string(),
                    name: rule.name().to_string(),
                    amount_type: rule.value().amount_type().to_string(),
                })
                .collect(),
            item_discounts,
            discount_breakdown: result.breakdown().iter().map(Into::into).collect(),
        }
    }
}

/// Checkout session, as recorded on the order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutSessionResponse {
    /// Restaurant id
    pub restaurant_id: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// Pre-discount subtotal, minor units
    pub subtotal: i64,

    /// Discount applied, minor units
    pub total_discount: i64,

    /// Amount to charge, minor units
    pub amount_due: i64,

    /// Ids of the rules applied, stored on the order for audit
    pub applied_discount_ids: Vec<String>,

    /// Set when the client's discount differed from the server's
    pub notice: Option<String>,
}
