//! Report formatting for the derived ledgers.
//!
//! These functions turn stock balances and progress values into short text
//! blocks. They are framework-agnostic; the bot layer places the text into embed
//! fields.

use crate::{
    core::{
        progress::{OrderProgress, OrderSummary, PartProgress},
        reservation::Reservation,
        sizes::SizeVector,
        stock::StockBalance,
    },
    errors::Result,
};
use std::fmt::Write;

/// Percentage of the ordered quantity already produced.
///
/// An order line for zero pieces counts as complete.
#[must_use]
pub fn completion_percent(ordered: i64, produced: i64) -> f64 {
    if ordered <= 0 {
        return 100.0;
    }

    #[allow(clippy::cast_precision_loss)] // piece counts stay far below 2^52
    let percent = (produced as f64 / ordered as f64) * 100.0;
    percent
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress is in [0, 100] and length is small, so the result fits
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Lists the non-zero sizes of a vector, e.g. `PP 1 · M 3`. `-` when empty.
#[must_use]
pub fn format_sizes(sizes: &SizeVector) -> String {
    let parts: Vec<String> = crate::core::sizes::Size::ALL
        .into_iter()
        .filter(|size| sizes.get(*size) != 0)
        .map(|size| format!("{size} {}", sizes.get(size)))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" · ")
    }
}

/// One-line reservation summary, e.g. `Acme 4, Beta 2`.
#[must_use]
pub fn format_reservations(reservations: &[Reservation]) -> String {
    reservations
        .iter()
        .map(|r| format!("{} {}", r.customer, r.reserved))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text block for one stock ledger line.
pub fn format_stock_balance(balance: &StockBalance) -> Result<String> {
    let mut out = String::new();
    if balance.is_deficit() {
        writeln!(out, "**On hand:** {} ⚠️ over-shipped", balance.total_on_hand)?;
    } else {
        writeln!(out, "**On hand:** {}", balance.total_on_hand)?;
    }
    for color in &balance.per_color {
        writeln!(out, "• {}: {}", color.color, format_sizes(&color.sizes))?;
    }
    if !balance.reservations.is_empty() {
        write!(
            out,
            "**Reserved:** {} ({})",
            balance.total_reserved,
            format_reservations(&balance.reservations)
        )?;
    }
    Ok(out.trim_end().to_string())
}

/// Text block for one part of an order.
pub fn format_part_progress(part: &PartProgress) -> Result<String> {
    let mut out = String::new();
    let percent = completion_percent(part.ordered_total(), part.produced_total());
    writeln!(
        out,
        "{} {}/{}",
        format_progress_bar(percent, None),
        part.produced_total(),
        part.ordered_total()
    )?;
    for color in &part.colors {
        write!(
            out,
            "• {}: ordered {} / produced {}",
            color.bucket,
            format_sizes(&color.ordered),
            format_sizes(&color.produced)
        )?;
        if color.shortfall() > 0 {
            write!(out, " (missing {})", color.shortfall())?;
        } else if color.surplus() > 0 {
            write!(out, " (+{} extra)", color.surplus())?;
        }
        writeln!(out)?;
    }
    Ok(out.trim_end().to_string())
}

/// Headline numbers of an order, e.g. `Produced 9/8 · +1 extra`.
#[must_use]
pub fn format_order_totals(progress: &OrderProgress) -> String {
    let mut line = format!(
        "Produced {}/{}",
        progress.produced_total(),
        progress.ordered_total()
    );
    if progress.shortfall() > 0 {
        line.push_str(&format!(" · missing {}", progress.shortfall()));
    } else if progress.surplus() > 0 {
        line.push_str(&format!(" · +{} extra", progress.surplus()));
    }
    line
}

/// One line of the fleet progress view.
#[must_use]
pub fn format_order_summary(summary: &OrderSummary) -> String {
    let marker = if summary.delivery_status.is_alert() {
        "🔴"
    } else {
        "🟢"
    };
    let percent = completion_percent(summary.ordered, summary.produced);
    format!(
        "{marker} {} | {} | {}/{} ({percent:.0}%) | {}",
        summary.order.order_code,
        summary.order.customer,
        summary.produced,
        summary.ordered,
        summary.delivery_status
    )
}
