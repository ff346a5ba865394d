//! Carte
//!
//! Evaluates a fixture set's discount rules against its cart and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-a` to evaluate at a restaurant-local time instead of now
//! Use `-v rule_id=value` to enter an amount for a variable rule

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::Timestamp;
use tracing_subscriber::EnvFilter;

use carte::{cli::CalculateArgs, context::EvaluationContext, fixtures::Fixture};

/// Calculate and print a receipt
#[expect(clippy::print_stdout, reason = "CLI output to user")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_missing| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    let args = CalculateArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let engine = fixture.engine()?;
    let cart = fixture.cart()?;

    let context = match args.at {
        Some(local) => EvaluationContext::at_local(local),
        None => EvaluationContext::new(Timestamp::now(), &fixture.time_zone()?),
    }
    .with_variable_amounts(args.variable_amounts());

    let start = Instant::now();

    let result = engine.calculate(&cart, &context)?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "\n Evaluated at {}", context.now())?;

    result.write_to(&mut handle, &cart)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
