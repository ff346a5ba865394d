//! Discount Engine
//!
//! Runs the whole pipeline for one cart: eligibility, matching, amounts, conflict
//! resolution and application. The engine is a pure function of its rules, the cart
//! and the evaluation context.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    amounts::{calculate_amount, resolve_value},
    applier::apply,
    cart::CartSnapshot,
    context::EvaluationContext,
    discounts::DiscountError,
    eligibility::{Rejection, check_eligibility, check_temporal},
    matching::match_targets,
    resolver::{Candidate, pick_winner},
    result::{DiscountResult, OutcomeStatus, RuleOutcome},
    rules::{
        DiscountRule,
        normalize::{RuleError, normalize},
        record::DiscountRecord,
    },
};

/// Errors that stop a calculation outright.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The cart is priced in a different currency than the rules.
    #[error("cart currency {cart} does not match rule currency {rules}")]
    CurrencyMismatch {
        /// Cart currency code
        cart: &'static str,
        /// Rule set currency code
        rules: &'static str,
    },

    /// Final totals could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// A rule set entry, usable or not.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedRule<'a> {
    /// A normalized rule.
    Valid(DiscountRule<'a>),

    /// A record that failed normalization and is never evaluated.
    Invalid {
        /// Record id
        id: String,
        /// Record name
        name: String,
        /// Why the record was rejected
        error: RuleError,
    },
}

impl<'a> LoadedRule<'a> {
    /// Normalize one record, keeping the error if it is invalid. Nothing is logged.
    pub fn load(record: &DiscountRecord, currency: &'a Currency) -> Self {
        match normalize(record, currency) {
            Ok(rule) => Self::Valid(rule),
            Err(error) => Self::Invalid {
                id: record.id.clone(),
                name: record.name.clone(),
                error,
            },
        }
    }

    /// The normalized rule, if the record was valid.
    pub fn into_rule(self) -> Option<DiscountRule<'a>> {
        match self {
            Self::Valid(rule) => Some(rule),
            Self::Invalid { .. } => None,
        }
    }

    fn id(&self) -> &str {
        match self {
            Self::Valid(rule) => rule.id(),
            Self::Invalid { id, .. } => id,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Valid(rule) => rule.name(),
            Self::Invalid { name, .. } => name,
        }
    }
}

/// Evaluates a restaurant's rule set against carts.
#[derive(Debug, Clone)]
pub struct DiscountEngine<'a> {
    rules: Vec<LoadedRule<'a>>,
    currency: &'a Currency,
}

impl<'a> DiscountEngine<'a> {
    /// Normalize persisted records into an engine.
    ///
    /// Records that fail normalization are logged, kept out of evaluation and reported
    /// as invalid in every breakdown.
    pub fn from_records<'r>(
        records: impl IntoIterator<Item = &'r DiscountRecord>,
        currency: &'a Currency,
    ) -> Self {
        let rules = records
            .into_iter()
            .map(|record| {
                let loaded = LoadedRule::load(record, currency);

                if let LoadedRule::Invalid { id, error, .. } = &loaded {
                    warn!(rule_id = %id, %error, "excluding invalid discount rule");
                }

                loaded
            })
            .collect();

        Self { rules, currency }
    }

    /// Build an engine from already-normalized rules, in creation order.
    pub fn from_rules(
        rules: impl IntoIterator<Item = DiscountRule<'a>>,
        currency: &'a Currency,
    ) -> Self {
        Self {
            rules: rules.into_iter().map(LoadedRule::Valid).collect(),
            currency,
        }
    }

    /// Every rule set entry, in order.
    pub fn rules(&self) -> &[LoadedRule<'a>] {
        &self.rules
    }

    /// Rule set currency.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Automatic rules that are active at the context's time, ignoring any cart.
    ///
    /// This is a convenience listing; [`DiscountEngine::calculate`] re-checks everything.
    pub fn active_rules<'s>(
        &'s self,
        context: &'s EvaluationContext,
    ) -> impl Iterator<Item = &'s DiscountRule<'a>> + 's {
        self.rules.iter().filter_map(move |entry| match entry {
            LoadedRule::Valid(rule) if check_temporal(rule, context).is_ok() => Some(rule),
            LoadedRule::Valid(_) | LoadedRule::Invalid { .. } => None,
        })
    }

    /// Calculate the discount for a cart.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the cart currency differs from the rule set currency,
    /// or the final totals cannot be calculated. Per-rule problems never fail the
    /// calculation; they are recorded in the breakdown.
    #[tracing::instrument(
        name = "discount_engine.calculate",
        skip_all,
        fields(lines = cart.len(), rules = self.rules.len(), now = %context.now())
    )]
    pub fn calculate(
        &self,
        cart: &CartSnapshot<'a>,
        context: &EvaluationContext,
    ) -> Result<DiscountResult<'a>, EngineError> {
        if cart.currency() != self.currency {
            return Err(EngineError::CurrencyMismatch {
                cart: cart.currency().iso_alpha_code,
                rules: self.currency.iso_alpha_code,
            });
        }

        let mut statuses = Vec::with_capacity(self.rules.len());
        let mut candidates = Vec::new();

        for (index, entry) in self.rules.iter().enumerate() {
            let status = match entry {
                LoadedRule::Invalid { error, .. } => OutcomeStatus::Invalid {
                    reason: error.to_string(),
                },
                LoadedRule::Valid(rule) => match self.evaluate(index, rule, cart, context) {
                    Ok(candidate) => {
                        let amount = candidate.allocation.total().to_minor_units();

                        candidates.push(candidate);

                        OutcomeStatus::Superseded { amount }
                    }
                    Err(status) => status,
                },
            };

            debug!(rule_id = entry.id(), ?status, "evaluated discount rule");

            statuses.push(status);
        }

        let winner = pick_winner(&candidates).and_then(|position| {
            let candidate = candidates.get(position)?;
            let status = statuses.get_mut(candidate.index)?;

            *status = OutcomeStatus::Applied {
                amount: candidate.allocation.total().to_minor_units(),
            };

            info!(
                rule_id = candidate.rule.id(),
                amount = candidate.allocation.total().to_minor_units(),
                "applying discount"
            );

            Some((candidate.rule.clone(), candidate.allocation.clone()))
        });

        let breakdown = self
            .rules
            .iter()
            .zip(statuses)
            .map(|(entry, status)| RuleOutcome {
                rule_id: entry.id().to_string(),
                rule_name: entry.name().to_string(),
                status,
            })
            .collect();

        Ok(apply(cart, winner, breakdown)?)
    }

    /// Take one valid rule as far through the pipeline as it goes.
    fn evaluate<'r>(
        &self,
        index: usize,
        rule: &'r DiscountRule<'a>,
        cart: &CartSnapshot<'a>,
        context: &EvaluationContext,
    ) -> Result<Candidate<'r, 'a>, OutcomeStatus> {
        let ineligible = |reason: Rejection| OutcomeStatus::Ineligible { reason };

        check_eligibility(rule, context, cart.subtotal()).map_err(ineligible)?;

        let application = rule
            .application()
            .ok_or(ineligible(Rejection::NotAutomatic))?;

        let value = resolve_value(rule, context, self.currency).map_err(ineligible)?;

        let matched = match_targets(application, cart).ok_or(OutcomeStatus::NoMatch)?;

        let allocation = calculate_amount(&value, &matched, cart).map_err(|error| {
            warn!(rule_id = rule.id(), %error, "discount calculation failed");

            OutcomeStatus::CalculationFailed {
                reason: error.to_string(),
            }
        })?;

        if allocation.is_zero() {
            return Err(OutcomeStatus::ZeroAmount);
        }

        Ok(Candidate {
            index,
            rule,
            allocation,
        })
    }
}
