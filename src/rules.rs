//! Discount Rules
//!
//! The canonical, fully-typed form of a discount rule. Shapes that the admin forms
//! can express but that make no sense (BOGO fields on a non-BOGO rule, a cap on a
//! fixed discount, a zero purchase quantity) cannot be built here; the
//! [`normalize`] module is the only way in from persisted records.

use std::{fmt, num::NonZeroU32, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::rules::{
    schedule::{DateRange, Schedule},
    targets::Targets,
};

pub mod normalize;
pub mod record;
pub mod schedule;
pub mod targets;

/// How the discount value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountType {
    /// Percentage of the matched lines
    Percentage,

    /// Fixed amount off the matched lines
    Fixed,

    /// Fixed amount supplied at transaction time
    VariableAmount,

    /// Percentage supplied at transaction time
    VariablePercentage,
}

impl AmountType {
    /// Persisted name of the amount type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
            Self::VariableAmount => "variable_amount",
            Self::VariablePercentage => "variable_percentage",
        }
    }
}

impl fmt::Display for AmountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            "variable_amount" => Ok(Self::VariableAmount),
            "variable_percentage" => Ok(Self::VariablePercentage),
            other => Err(other.to_string()),
        }
    }
}

/// The value of a discount.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountValue<'a> {
    /// `points`% of the matched lines, optionally capped.
    Percentage {
        /// Percentage points (`12.5` is 12.5%)
        points: Decimal,
        /// Maximum discount value
        cap: Option<Money<'a, Currency>>,
    },

    /// A fixed amount, never more than the matched subtotal.
    Fixed(Money<'a, Currency>),

    /// A percentage entered at transaction time, optionally capped.
    VariablePercentage {
        /// Maximum discount value
        cap: Option<Money<'a, Currency>>,
    },

    /// A fixed amount entered at transaction time.
    VariableAmount,
}

impl DiscountValue<'_> {
    /// The amount type this value was built from.
    pub const fn amount_type(&self) -> AmountType {
        match self {
            Self::Percentage { .. } => AmountType::Percentage,
            Self::Fixed(_) => AmountType::Fixed,
            Self::VariablePercentage { .. } => AmountType::VariablePercentage,
            Self::VariableAmount => AmountType::VariableAmount,
        }
    }
}

/// Which lines a quantity rule rewards for a BOGO deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardTargets {
    /// Reward lines are the purchase lines.
    SameAsPurchase,

    /// Reward lines are chosen by their own targeting.
    Targets(Targets),
}

/// Quantity thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityRule {
    /// Purchase lines must sum to exactly this many units.
    Exact(NonZeroU32),

    /// Purchase lines must sum to at least this many units.
    Minimum(NonZeroU32),

    /// Every `buy` purchased units grant `get` discounted reward units, cheapest first.
    Bogo {
        /// Units per purchase group
        buy: NonZeroU32,
        /// Discounted units granted per group
        get: NonZeroU32,
        /// Lines eligible to receive the discounted units
        reward: RewardTargets,
    },
}

/// What an automatic rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Application {
    /// Every targeted line, at full quantity.
    ItemCategory {
        /// Targeted lines
        purchase: Targets,
    },

    /// Targeted lines, gated or granted by unit counts.
    Quantity {
        /// Lines counted towards the threshold
        purchase: Targets,
        /// Threshold rule
        rule: QuantityRule,
    },
}

/// How the rule is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Evaluated against every cart.
    Automatic(Application),

    /// Coupon / staff applied only; never picked by the engine.
    Manual,
}

/// A normalized discount rule.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountRule<'a> {
    id: String,
    name: String,
    value: DiscountValue<'a>,
    mode: Mode,
    schedule: Option<Schedule>,
    date_range: Option<DateRange>,
    minimum_spend: Option<Money<'a, Currency>>,
    created_at: Option<Timestamp>,
}

impl<'a> DiscountRule<'a> {
    /// Create a rule with no schedule, date range or spend gating.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: DiscountValue<'a>,
        mode: Mode,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            mode,
            schedule: None,
            date_range: None,
            minimum_spend: None,
            created_at: None,
        }
    }

    /// Restrict the rule to a weekly schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Restrict the rule to a date range.
    #[must_use]
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// Require a minimum cart subtotal.
    #[must_use]
    pub fn with_minimum_spend(mut self, minimum: Money<'a, Currency>) -> Self {
        self.minimum_spend = Some(minimum);
        self
    }

    /// Record when the rule was created.
    #[must_use]
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Rule id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Discount value
    pub fn value(&self) -> &DiscountValue<'a> {
        &self.value
    }

    /// Trigger mode
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// What the rule applies to, if it is automatic.
    pub fn application(&self) -> Option<&Application> {
        match &self.mode {
            Mode::Automatic(application) => Some(application),
            Mode::Manual => None,
        }
    }

    /// Weekly schedule
    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Date range
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Minimum cart subtotal
    pub fn minimum_spend(&self) -> Option<&Money<'a, Currency>> {
        self.minimum_spend.as_ref()
    }

    /// Creation timestamp
    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
}
