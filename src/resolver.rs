//! Conflict Resolution
//!
//! Discounts never stack: of every rule that is worth something, only the single most
//! valuable one is applied.

use std::cmp::{Ordering, Reverse};

use jiff::Timestamp;

use crate::{amounts::Allocation, rules::DiscountRule};

/// A rule that survived eligibility and matching with a non-zero amount.
#[derive(Debug, Clone)]
pub struct Candidate<'r, 'a> {
    /// Position of the rule in the rule set
    pub index: usize,

    /// The rule
    pub rule: &'r DiscountRule<'a>,

    /// What the rule is worth and where
    pub allocation: Allocation<'a>,
}

impl Candidate<'_, '_> {
    fn amount(&self) -> i64 {
        self.allocation.total().to_minor_units()
    }

    /// Ordering key: greatest amount, then earliest creation (undated last), then rule set order.
    fn rank(&self) -> (Reverse<i64>, (bool, Option<Timestamp>), usize) {
        let created_at = self.rule.created_at();

        (
            Reverse(self.amount()),
            (created_at.is_none(), created_at),
            self.index,
        )
    }
}

/// Position in `candidates` of the winning rule, or `None` if there are no candidates.
pub fn pick_winner(candidates: &[Candidate<'_, '_>]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by(|(_, left), (_, right)| compare(left, right))
        .map(|(position, _candidate)| position)
}

fn compare(left: &Candidate<'_, '_>, right: &Candidate<'_, '_>) -> Ordering {
    left.rank().cmp(&right.rank())
}
