//! Carte prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    amounts::{Allocation, LineAllocation, ResolvedValue},
    cart::{CartError, CartLine, CartLineRecord, CartSnapshot},
    categories::CategorySet,
    context::{EvaluationContext, VariableAmounts},
    discounts::DiscountError,
    eligibility::Rejection,
    engine::{DiscountEngine, EngineError, LoadedRule},
    fixtures::{Fixture, FixtureError},
    matching::{MatchedLine, TargetMatch},
    receipt::ReceiptError,
    result::{DiscountResult, ItemDiscount, OutcomeStatus, RuleOutcome},
    rules::{
        AmountType, Application, DiscountRule, DiscountValue, Mode, QuantityRule, RewardTargets,
        normalize::{RuleError, normalize},
        record::{DiscountRecord, ScheduleDaysRecord},
        schedule::{DateRange, Schedule, WeekdaySet},
        targets::Targets,
    },
};
