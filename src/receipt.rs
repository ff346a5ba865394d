//! Receipt

use std::{fmt::Write, io, ops::Range};

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{CartLine, CartSnapshot},
    result::{DiscountResult, OutcomeStatus, RuleOutcome},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

impl DiscountResult<'_> {
    /// Renders the result as a receipt for `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        cart: &CartSnapshot<'_>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        push_receipt_header(&mut builder);

        let mut color_ops: Vec<(usize, usize, Color)> = Vec::new();

        for (row, line) in cart.iter().enumerate() {
            append_line_row(self, line, &mut builder, &mut color_ops, row + 1)?;
        }

        write_table(&mut out, builder, Columns::new(3..8), color_ops)?;

        write_receipt_summary(&mut out, self)?;

        write_breakdown(&mut out, self.breakdown())
    }
}

fn push_receipt_header(builder: &mut Builder) {
    builder.push_record([
        "",
        "Item",
        "Qty",
        "Unit Price",
        "Subtotal",
        "Discount",
        "%",
        "Net",
    ]);
}

fn append_line_row(
    result: &DiscountResult<'_>,
    line: &CartLine<'_>,
    builder: &mut Builder,
    color_ops: &mut Vec<(usize, usize, Color)>,
    row: usize,
) -> Result<(), ReceiptError> {
    let subtotal = *line.subtotal();

    let (discount, percentage, net) = match result.item_discount(line.group_key()) {
        Some(item) if item.discount_amount().to_minor_units() > 0 => {
            color_ops.push((row, 5, Color::FG_GREEN));
            color_ops.push((row, 7, Color::FG_GREEN));

            (
                format!("-{}", item.discount_amount()),
                format!("{:.2}%", item.discount_percentage()),
                format!("{}", subtotal.sub(*item.discount_amount())?),
            )
        }
        _ => (String::new(), String::new(), format!("{subtotal}")),
    };

    builder.push_record([
        format!("#{row:<3}"),
        line.item_id().to_string(),
        line.quantity().to_string(),
        format!("{}", line.unit_price()),
        format!("{subtotal}"),
        discount,
        percentage,
        net,
    ]);

    color_ops.push((row, 0, color_dark_grey()));

    Ok(())
}

fn write_breakdown(
    out: &mut impl io::Write,
    breakdown: &[RuleOutcome],
) -> Result<(), ReceiptError> {
    if breakdown.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();
    let mut color_ops = Vec::new();

    builder.push_record(["Rule", "Name", "Outcome", "Detail"]);

    for (idx, outcome) in breakdown.iter().enumerate() {
        let (label, detail) = outcome_cells(&outcome.status);

        if matches!(outcome.status, OutcomeStatus::Applied { .. }) {
            color_ops.push((idx + 1, 2, Color::FG_GREEN));
        }

        builder.push_record([
            outcome.rule_id.clone(),
            outcome.rule_name.clone(),
            label.to_string(),
            detail,
        ]);
    }

    write_table(out, builder, Columns::new(3..4), color_ops)
}

fn outcome_cells(status: &OutcomeStatus) -> (&'static str, String) {
    match status {
        OutcomeStatus::Invalid { reason } => ("invalid", reason.clone()),
        OutcomeStatus::Ineligible { reason } => ("ineligible", reason.to_string()),
        OutcomeStatus::NoMatch => ("no match", String::new()),
        OutcomeStatus::ZeroAmount => ("zero amount", String::new()),
        OutcomeStatus::CalculationFailed { reason } => ("failed", reason.clone()),
        OutcomeStatus::Superseded { amount } => ("superseded", amount.to_string()),
        OutcomeStatus::Applied { amount } => ("applied", amount.to_string()),
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: Columns<Range<usize>>,
    color_ops: Vec<(usize, usize, Color)>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(right_aligned, Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    result: &DiscountResult<'_>,
) -> Result<(), ReceiptError> {
    let discount_percent = percent_of(result.total_discount(), result.subtotal());

    let subtotal_label = " Subtotal:";
    let discount_label = " Discount:";
    let total_label = " \x1b[1mTotal:\x1b[0m";
    let applied_label = " Applied:";

    let subtotal_val = format!("{}  ", result.subtotal());
    let discount_val = format!("({discount_percent:.2}%) {}  ", result.total_discount());
    let total_val = format!("{}  ", result.total());
    let applied_val = format!(
        "{}  ",
        result
            .applied_discounts()
            .first()
            .map_or("none", |rule| rule.name())
    );

    let label_width = visible_width(subtotal_label)
        .max(visible_width(discount_label))
        .max(visible_width(total_label))
        .max(visible_width(applied_label));

    let value_width = subtotal_val
        .len()
        .max(discount_val.len())
        .max(total_val.len())
        .max(applied_val.len());

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
    write_summary_line(out, discount_label, &discount_val, label_width, value_width)?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    write_summary_line(out, applied_label, &applied_val, label_width, value_width)?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// `part / whole × 100`, or zero when `whole` is zero.
fn percent_of(part: &Money<'_, Currency>, whole: &Money<'_, Currency>) -> Decimal {
    let whole = whole.to_minor_units();

    if whole == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(part.to_minor_units()) * Decimal::ONE_HUNDRED / Decimal::from(whole))
        .round_dp(2)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
