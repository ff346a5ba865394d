//! Discount Results
//!
//! What the engine hands back: totals, the winning rule, per-line discounts and an
//! audit trail of every rule it looked at.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{eligibility::Rejection, rules::DiscountRule};

/// Discount allocated to one cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDiscount<'a> {
    discount_amount: Money<'a, Currency>,
    discount_percentage: Decimal,
}

impl<'a> ItemDiscount<'a> {
    /// Create a line discount.
    pub fn new(discount_amount: Money<'a, Currency>, discount_percentage: Decimal) -> Self {
        Self {
            discount_amount,
            discount_percentage,
        }
    }

    /// Amount taken off the line.
    pub fn discount_amount(&self) -> &Money<'a, Currency> {
        &self.discount_amount
    }

    /// `discount_amount / line subtotal × 100`, to two decimal places.
    pub fn discount_percentage(&self) -> Decimal {
        self.discount_percentage
    }
}

/// What happened to one rule during a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The persisted rule could not be normalized.
    Invalid {
        /// Normalization error
        reason: String,
    },

    /// The rule is valid but not active for this moment or cart.
    Ineligible {
        /// First failing check
        reason: Rejection,
    },

    /// No cart lines matched the rule.
    NoMatch,

    /// The rule matched but is worth nothing.
    ZeroAmount,

    /// The amount could not be calculated.
    CalculationFailed {
        /// Calculation error
        reason: String,
    },

    /// The rule was worth something, but another rule was worth more.
    Superseded {
        /// Amount in minor units
        amount: i64,
    },

    /// The rule won and was applied.
    Applied {
        /// Amount in minor units
        amount: i64,
    },
}

impl OutcomeStatus {
    /// Snake-case status code, as serialized.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "invalid",
            Self::Ineligible { .. } => "ineligible",
            Self::NoMatch => "no_match",
            Self::ZeroAmount => "zero_amount",
            Self::CalculationFailed { .. } => "calculation_failed",
            Self::Superseded { .. } => "superseded",
            Self::Applied { .. } => "applied",
        }
    }

    /// Why the rule was passed over, if there is a reason beyond the status.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Invalid { reason } | Self::CalculationFailed { reason } => Some(reason.clone()),
            Self::Ineligible { reason } => Some(reason.code().to_string()),
            Self::NoMatch | Self::ZeroAmount | Self::Superseded { .. } | Self::Applied { .. } => {
                None
            }
        }
    }

    /// Discount amount in minor units, for rules that produced one.
    pub const fn amount(&self) -> Option<i64> {
        match self {
            Self::Superseded { amount } | Self::Applied { amount } => Some(*amount),
            Self::Invalid { .. }
            | Self::Ineligible { .. }
            | Self::NoMatch
            | Self::ZeroAmount
            | Self::CalculationFailed { .. } => None,
        }
    }
}

/// Audit entry for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    /// Rule id
    pub rule_id: String,

    /// Rule display name
    pub rule_name: String,

    /// What happened to the rule
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Result of a discount calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountResult<'a> {
    subtotal: Money<'a, Currency>,
    total_discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    applied_discounts: SmallVec<[DiscountRule<'a>; 1]>,
    item_discounts: FxHashMap<String, ItemDiscount<'a>>,
    breakdown: Vec<RuleOutcome>,
}

impl<'a> DiscountResult<'a> {
    pub(crate) fn new(
        subtotal: Money<'a, Currency>,
        total_discount: Money<'a, Currency>,
        total: Money<'a, Currency>,
        applied_discounts: SmallVec<[DiscountRule<'a>; 1]>,
        item_discounts: FxHashMap<String, ItemDiscount<'a>>,
        breakdown: Vec<RuleOutcome>,
    ) -> Self {
        Self {
            subtotal,
            total_discount,
            total,
            applied_discounts,
            item_discounts,
            breakdown,
        }
    }

    /// Pre-discount cart subtotal.
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Total discount applied.
    pub fn total_discount(&self) -> &Money<'a, Currency> {
        &self.total_discount
    }

    /// Amount to charge, never negative.
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// The winning rule, if any.
    pub fn applied_discounts(&self) -> &[DiscountRule<'a>] {
        &self.applied_discounts
    }

    /// Per-line discounts keyed by group key.
    pub fn item_discounts(&self) -> &FxHashMap<String, ItemDiscount<'a>> {
        &self.item_discounts
    }

    /// Discount on a line, if it received one.
    pub fn item_discount(&self, group_key: &str) -> Option<&ItemDiscount<'a>> {
        self.item_discounts.get(group_key)
    }

    /// One entry per rule, in rule set order.
    pub fn breakdown(&self) -> &[RuleOutcome] {
        &self.breakdown
    }
}
