//! Carte
//!
//! Carte is a discount engine for restaurant checkouts. It normalises a restaurant's
//! discount rules, checks which of them are live at the restaurant's local time, matches
//! them against a cart snapshot and applies the single best discount, with a per-rule
//! breakdown of why everything else was passed over.

pub mod amounts;
pub mod applier;
pub mod cart;
pub mod categories;
pub mod cli;
pub mod context;
pub mod discounts;
pub mod eligibility;
pub mod engine;
pub mod fixtures;
pub mod matching;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod resolver;
pub mod result;
pub mod rules;
