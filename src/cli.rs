//! Command line arguments

use clap::Parser;
use jiff::civil::DateTime;
use rust_decimal::Decimal;

use crate::context::VariableAmounts;

/// Calculate the discount for a fixture set's cart and print the receipt.
#[derive(Debug, Parser)]
#[clap(name = "carte", version)]
pub struct CalculateArgs {
    /// Fixture set to use for the rules & cart
    #[clap(short, long, default_value = "lunch")]
    pub fixture: String,

    /// Restaurant-local time to evaluate at, e.g. `2024-01-01T12:00` (defaults to now)
    #[clap(short, long)]
    pub at: Option<DateTime>,

    /// Amount for a variable rule, as `rule_id=value` (repeatable)
    #[clap(short, long = "variable", value_parser = parse_variable)]
    pub variables: Vec<(String, Decimal)>,
}

impl CalculateArgs {
    /// The `--variable` entries keyed by rule id.
    pub fn variable_amounts(&self) -> VariableAmounts {
        self.variables.iter().cloned().collect()
    }
}

/// Parse a `rule_id=value` pair.
///
/// # Errors
///
/// Returns a message if the pair has no `=`, an empty rule id or a non-numeric value.
pub fn parse_variable(value: &str) -> Result<(String, Decimal), String> {
    let (rule_id, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("expected rule_id=value, got {value:?}"))?;

    let rule_id = rule_id.trim();

    if rule_id.is_empty() {
        return Err(format!("missing rule id in {value:?}"));
    }

    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|error| format!("invalid amount for {rule_id}: {error}"))?;

    Ok((rule_id.to_string(), amount))
}
