//! Stock ledger - finished production minus delivered order lines.
//!
//! The ledger is recomputed from the raw rows on every read:
//!
//! 1. production is grouped by part, then by color, summing the size vectors;
//! 2. every line item of a Delivered order is subtracted from its (part, color)
//!    bucket, and ignored when that bucket was never produced;
//! 3. each part reports the colors and sizes still on hand and its netted total;
//! 4. open-order reservations are attached for display only.
//!
//! Netted stock can go negative when more was shipped than logged. Whether such
//! parts are listed is a [`StockVisibility`] policy; parts netting to exactly
//! zero are never listed.

use crate::{
    core::{
        order::{self, ItemFilter, OrderFilter},
        production,
        reservation::{self, Reservation, ReservationLedger},
        sizes::{Size, SizeVector},
    },
    entities::{finished_good, order_item},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

/// Which parts the stock ledger lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockVisibility {
    /// Only parts with stock strictly above zero
    #[default]
    PositiveOnly,
    /// Also parts that net below zero (over-shipped)
    IncludeDeficits,
}

impl StockVisibility {
    const fn shows(self, total_on_hand: i64) -> bool {
        match self {
            Self::PositiveOnly => total_on_hand > 0,
            Self::IncludeDeficits => total_on_hand != 0,
        }
    }
}

/// Netted quantities of one color of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorStock {
    /// Color as logged in production
    pub color: String,
    /// Produced minus delivered, per size
    pub sizes: SizeVector,
}

/// Netted stock of one part, before visibility filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartStock {
    /// Business code of the part
    pub part_id: String,
    /// Description from the first production entry seen
    pub description: String,
    /// Colors in first-appearance order
    pub colors: Vec<ColorStock>,
}

impl PartStock {
    /// Colors whose netted total is above zero.
    #[must_use]
    pub fn colors_available(&self) -> Vec<String> {
        self.colors
            .iter()
            .filter(|c| c.sizes.total() > 0)
            .map(|c| c.color.clone())
            .collect()
    }

    /// Sizes with a positive netted count in at least one color, canonical order.
    #[must_use]
    pub fn sizes_available(&self) -> Vec<Size> {
        let sizes: BTreeSet<Size> = self
            .colors
            .iter()
            .flat_map(|c| c.sizes.positive_sizes())
            .collect();
        sizes.into_iter().collect()
    }

    /// Sum of the netted totals of every color.
    #[must_use]
    pub fn total_on_hand(&self) -> i64 {
        self.colors.iter().map(|c| c.sizes.total()).sum()
    }

    fn color_mut(&mut self, color: &str) -> Option<&mut ColorStock> {
        self.colors.iter_mut().find(|c| c.color == color)
    }
}

/// One line of the stock ledger as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockBalance {
    /// Business code of the part
    pub part_id: String,
    /// Part description
    pub description: String,
    /// Colors with stock on hand
    pub colors_available: Vec<String>,
    /// Sizes with stock on hand
    pub sizes_available: Vec<Size>,
    /// Netted quantity across all colors
    pub total_on_hand: i64,
    /// Netted quantities per color
    pub per_color: Vec<ColorStock>,
    /// Open demand per customer (color-blind)
    pub reservations: Vec<Reservation>,
    /// Sum of `reservations`
    pub total_reserved: i64,
}

impl StockBalance {
    /// True when more was delivered than produced.
    #[must_use]
    pub const fn is_deficit(&self) -> bool {
        self.total_on_hand < 0
    }
}

/// Nets production against delivered order lines, grouped by part then color.
///
/// Parts come out ordered by part id; colors keep first-appearance order.
#[must_use]
pub fn fold_stock(
    production: &[finished_good::Model],
    delivered_items: &[order_item::Model],
) -> Vec<PartStock> {
    let mut parts: BTreeMap<String, PartStock> = BTreeMap::new();

    for entry in production {
        let part = parts
            .entry(entry.part_id.clone())
            .or_insert_with(|| PartStock {
                part_id: entry.part_id.clone(),
                description: entry.description.clone(),
                colors: Vec::new(),
            });
        match part.color_mut(&entry.color) {
            Some(bucket) => bucket.sizes += entry.sizes(),
            None => part.colors.push(ColorStock {
                color: entry.color.clone(),
                sizes: entry.sizes(),
            }),
        }
    }

    for item in delivered_items {
        let bucket = parts
            .get_mut(&item.part_id)
            .and_then(|part| part.color_mut(&item.color));
        match bucket {
            Some(bucket) => bucket.sizes -= item.sizes(),
            None => debug!(
                "Delivered item {} ({} / '{}') has no production bucket; ignored",
                item.id, item.part_id, item.color
            ),
        }
    }

    parts.into_values().collect()
}

/// Turns netted parts into ledger lines, applying the visibility policy and
/// attaching reservations.
#[must_use]
pub fn summarize_stock(
    parts: Vec<PartStock>,
    reservations: &ReservationLedger,
    visibility: StockVisibility,
) -> Vec<StockBalance> {
    parts
        .into_iter()
        .filter_map(|part| {
            let total_on_hand = part.total_on_hand();
            if !visibility.shows(total_on_hand) {
                return None;
            }
            let part_reservations = reservations.for_part(&part.part_id).to_vec();
            let total_reserved = part_reservations.iter().map(|r| r.reserved).sum();
            Some(StockBalance {
                colors_available: part.colors_available(),
                sizes_available: part.sizes_available(),
                total_on_hand,
                reservations: part_reservations,
                total_reserved,
                part_id: part.part_id,
                description: part.description,
                per_color: part.colors,
            })
        })
        .collect()
}

/// Builds the stock ledger from the store.
///
/// Any failed fetch aborts the whole computation; no partial ledger is returned.
#[instrument(skip(db))]
pub async fn build_stock_ledger(
    db: &DatabaseConnection,
    visibility: StockVisibility,
) -> Result<Vec<StockBalance>> {
    let production = production::fetch_production(db).await?;
    let delivered_orders = order::fetch_orders(db, &OrderFilter::delivered()).await?;
    let codes = delivered_orders.into_iter().map(|o| o.order_code).collect();
    let delivered_items = order::fetch_order_items(db, &ItemFilter::for_orders(codes)).await?;
    let reservations = reservation::build_reservation_ledger(db).await?;

    let balances = summarize_stock(
        fold_stock(&production, &delivered_items),
        &reservations,
        visibility,
    );
    info!(
        "Stock ledger: {} part(s) listed from {} production row(s) and {} delivered item(s)",
        balances.len(),
        production.len(),
        delivered_items.len()
    );
    Ok(balances)
}

/// Keeps balances whose part id or description contains `query`, ignoring case.
#[must_use]
pub fn filter_stock(balances: Vec<StockBalance>, query: &str) -> Vec<StockBalance> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return balances;
    }
    balances
        .into_iter()
        .filter(|b| {
            b.part_id.to_lowercase().contains(&query)
                || b.description.to_lowercase().contains(&query)
        })
        .collect()
}
