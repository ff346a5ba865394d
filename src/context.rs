//! Evaluation Context
//!
//! Everything the engine needs that does not come from the cart or the rules: the
//! restaurant-local "now" and any amounts entered at transaction time.

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

/// Amounts entered at transaction time for variable rules, keyed by rule id.
///
/// Values are minor units for `variable_amount` rules and percentage points for
/// `variable_percentage` rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableAmounts {
    amounts: FxHashMap<String, Decimal>,
}

impl VariableAmounts {
    /// Set the amount for a rule, replacing any previous value.
    pub fn insert(&mut self, rule_id: impl Into<String>, amount: Decimal) {
        self.amounts.insert(rule_id.into(), amount);
    }

    /// Get the amount entered for a rule.
    pub fn get(&self, rule_id: &str) -> Option<Decimal> {
        self.amounts.get(rule_id).copied()
    }

    /// Returns true if no amounts were entered.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for VariableAmounts {
    fn from_iter<T: IntoIterator<Item = (K, Decimal)>>(iter: T) -> Self {
        Self {
            amounts: iter
                .into_iter()
                .map(|(rule_id, amount)| (rule_id.into(), amount))
                .collect(),
        }
    }
}

/// Inputs to a single engine run besides the cart and rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    now: DateTime,
    variable_amounts: VariableAmounts,
}

impl EvaluationContext {
    /// Evaluate at `timestamp` as seen in the restaurant's time zone.
    pub fn new(timestamp: Timestamp, time_zone: &TimeZone) -> Self {
        Self::at_local(timestamp.to_zoned(time_zone.clone()).datetime())
    }

    /// Evaluate at a restaurant-local civil datetime.
    pub fn at_local(now: DateTime) -> Self {
        Self {
            now,
            variable_amounts: VariableAmounts::default(),
        }
    }

    /// Attach amounts entered at transaction time.
    #[must_use]
    pub fn with_variable_amounts(mut self, variable_amounts: VariableAmounts) -> Self {
        self.variable_amounts = variable_amounts;
        self
    }

    /// Restaurant-local "now".
    pub fn now(&self) -> DateTime {
        self.now
    }

    /// Amounts entered at transaction time.
    pub fn variable_amounts(&self) -> &VariableAmounts {
        &self.variable_amounts
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_converts_to_restaurant_local_time() -> TestResult {
        let timestamp: Timestamp = "2024-01-01T02:30:00Z".parse()?;
        let plus_seven = TimeZone::fixed(jiff::tz::offset(7));

        let context = EvaluationContext::new(timestamp, &plus_seven);

        assert_eq!(context.now(), date(2024, 1, 1).at(9, 30, 0, 0));

        Ok(())
    }

    #[test]
    fn variable_amounts_are_looked_up_by_rule_id() {
        let context = EvaluationContext::at_local(date(2024, 1, 1).at(12, 0, 0, 0))
            .with_variable_amounts([("staff", Decimal::from(500))].into_iter().collect());

        assert_eq!(context.variable_amounts().get("staff"), Some(Decimal::from(500)));
        assert_eq!(context.variable_amounts().get("other"), None);
    }
}
