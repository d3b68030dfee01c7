//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for part ids, order codes and
//! colors, suggesting values already present in the store as the user types.

use crate::{
    bot::BotData,
    core::{cut, order, production},
    errors::{Error, Result},
};
use tracing::warn;

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Keeps the values containing `partial` (case-insensitive), at most 25.
#[must_use]
pub fn filter_suggestions(values: Vec<String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    values
        .into_iter()
        .filter(|value| value.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Filters a store lookup, logging and suggesting nothing when it failed.
fn suggestions_or_empty(values: Result<Vec<String>>, partial: &str, what: &str) -> Vec<String> {
    match values {
        Ok(values) => filter_suggestions(values, partial),
        Err(e) => {
            warn!("{what} autocomplete failed: {e}");
            Vec::new()
        }
    }
}

/// Provides autocomplete suggestions for part ids seen in production or orders.
pub async fn autocomplete_part_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggestions_or_empty(
        production::list_part_ids(&ctx.data().database).await,
        partial,
        "Part id",
    )
}

/// Provides autocomplete suggestions for order codes.
pub async fn autocomplete_order_code(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggestions_or_empty(
        order::list_order_codes(&ctx.data().database).await,
        partial,
        "Order code",
    )
}

/// Provides autocomplete suggestions for colors used in cutting batches.
pub async fn autocomplete_color(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggestions_or_empty(
        cut::list_colors(&ctx.data().database).await,
        partial,
        "Color",
    )
}
