//! Target Matching
//!
//! Selects the cart lines (and, for BOGO deals, the individual units) that a rule's
//! amount is calculated against.

use std::cmp::Reverse;

use smallvec::SmallVec;

use crate::{
    cart::{CartLine, CartSnapshot},
    rules::{Application, QuantityRule, RewardTargets, targets::Targets},
};

/// A cart line selected by a rule, with the number of units that count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedLine {
    /// Index of the line in the cart
    pub line: usize,

    /// Units of the line that the discount applies to
    pub quantity: u32,
}

/// Lines a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetMatch {
    /// The discount is shared across these lines in proportion to their value.
    Lines(SmallVec<[MatchedLine; 8]>),

    /// The discount applies per unit to exactly these units (BOGO rewards).
    Units(SmallVec<[MatchedLine; 8]>),
}

impl TargetMatch {
    /// The matched lines, in cart order.
    pub fn lines(&self) -> &[MatchedLine] {
        match self {
            Self::Lines(lines) | Self::Units(lines) => lines,
        }
    }
}

/// Match an automatic rule's application against the cart.
///
/// Returns `None` when nothing matches, in which case the rule contributes nothing.
pub fn match_targets(application: &Application, cart: &CartSnapshot<'_>) -> Option<TargetMatch> {
    match application {
        Application::ItemCategory { purchase } => {
            non_empty(matching_lines(purchase, cart)).map(TargetMatch::Lines)
        }
        Application::Quantity { purchase, rule } => {
            let lines = matching_lines(purchase, cart);
            let units = total_units(&lines);

            match rule {
                QuantityRule::Exact(quantity) => {
                    (units == u64::from(quantity.get())).then_some(TargetMatch::Lines(lines))
                }
                QuantityRule::Minimum(quantity) => {
                    (units >= u64::from(quantity.get())).then_some(TargetMatch::Lines(lines))
                }
                QuantityRule::Bogo { buy, get, reward } => {
                    let groups = units / u64::from(buy.get());
                    let granted = groups.saturating_mul(u64::from(get.get()));

                    let candidates = match reward {
                        RewardTargets::SameAsPurchase => lines,
                        RewardTargets::Targets(targets) => {
                            let purchased = dearest_units(
                                &lines,
                                cart,
                                groups.saturating_mul(u64::from(buy.get())),
                            );

                            without_units(matching_lines(targets, cart), &purchased)
                        }
                    };

                    non_empty(cheapest_units(candidates, cart, granted)).map(TargetMatch::Units)
                }
            }
        }
    }
}

/// Every line the targets select, at full quantity, in cart order.
fn matching_lines(targets: &Targets, cart: &CartSnapshot<'_>) -> SmallVec<[MatchedLine; 8]> {
    cart.iter()
        .enumerate()
        .filter(|(_idx, line)| targets.matches(line))
        .map(|(idx, line)| MatchedLine {
            line: idx,
            quantity: line.quantity(),
        })
        .collect()
}

/// Take up to `granted` units from `candidates`, lowest unit price first.
///
/// Lines with the same unit price keep their cart order. The result is returned in
/// cart order.
fn cheapest_units(
    mut candidates: SmallVec<[MatchedLine; 8]>,
    cart: &CartSnapshot<'_>,
    granted: u64,
) -> SmallVec<[MatchedLine; 8]> {
    candidates.sort_by_key(|matched| unit_price(cart, matched.line));

    take_units(candidates, granted)
}

/// The purchase units that pay for `needed` units, highest unit price first, so the
/// cheapest units stay available as rewards.
fn dearest_units(
    lines: &[MatchedLine],
    cart: &CartSnapshot<'_>,
    needed: u64,
) -> SmallVec<[MatchedLine; 8]> {
    let mut dearest: SmallVec<[MatchedLine; 8]> = lines.iter().copied().collect();

    dearest.sort_by_key(|matched| Reverse(unit_price(cart, matched.line)));

    take_units(dearest, needed)
}

/// Take up to `wanted` units from `ordered`, front to back, returned in cart order.
fn take_units(ordered: SmallVec<[MatchedLine; 8]>, wanted: u64) -> SmallVec<[MatchedLine; 8]> {
    let mut remaining = wanted;
    let mut selected: SmallVec<[MatchedLine; 8]> = SmallVec::new();

    for candidate in ordered {
        if remaining == 0 {
            break;
        }

        let take = u64::from(candidate.quantity).min(remaining);

        remaining -= take;

        selected.push(MatchedLine {
            line: candidate.line,
            quantity: u32::try_from(take).unwrap_or(candidate.quantity),
        });
    }

    selected.sort_by_key(|matched| matched.line);
    selected
}

/// `candidates` less the units already spent in `used`, dropping lines with none left.
fn without_units(
    candidates: SmallVec<[MatchedLine; 8]>,
    used: &[MatchedLine],
) -> SmallVec<[MatchedLine; 8]> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let spent = used
                .iter()
                .find(|matched| matched.line == candidate.line)
                .map_or(0, |matched| matched.quantity);

            let quantity = candidate.quantity.saturating_sub(spent);

            (quantity > 0).then_some(MatchedLine {
                line: candidate.line,
                quantity,
            })
        })
        .collect()
}

fn unit_price(cart: &CartSnapshot<'_>, line: usize) -> i64 {
    cart.line(line)
        .map_or(i64::MAX, |line: &CartLine<'_>| line.unit_price().to_minor_units())
}

fn total_units(lines: &[MatchedLine]) -> u64 {
    lines.iter().map(|matched| u64::from(matched.quantity)).sum()
}

fn non_empty(lines: SmallVec<[MatchedLine; 8]>) -> Option<SmallVec<[MatchedLine; 8]>> {
    (!lines.is_empty()).then_some(lines)
}
