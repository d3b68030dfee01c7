//! Order progress - ordered vs produced quantities per order, part and color.
//!
//! Production counts toward an order when it was made for the order's customer
//! and for a part the order references. Within a part, color is a secondary key
//! chosen once per (order, part):
//!
//! - when any of the order's lines for the part names a color, production goes
//!   to the bucket with the identical color and other colors are not counted;
//! - when every line left the color blank, all production for the part goes to a
//!   single [`ColorBucket::AnyColor`] bucket.
//!
//! Blank-color lines of a part that also has colored lines keep their ordered
//! quantities in an `AnyColor` bucket that receives no production.

use crate::{
    core::{
        deadline::{self, DeliveryStatus},
        order::{self, ItemFilter, OrderFilter},
        production,
        sizes::{self, SizeVector},
    },
    entities::{finished_good, order as order_entity, order_item},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, info, instrument};

/// Where ordered and produced quantities of a part are accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorBucket {
    /// Exactly this color
    Color(String),
    /// Any color accepted
    AnyColor,
}

impl ColorBucket {
    fn for_color(color: &str) -> Self {
        if color.is_empty() {
            Self::AnyColor
        } else {
            Self::Color(color.to_string())
        }
    }
}

impl fmt::Display for ColorBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => f.write_str(color),
            Self::AnyColor => f.write_str("(all)"),
        }
    }
}

/// How production is routed for one part of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartMatching {
    /// The order names colors for the part
    ByColor,
    /// The order accepts any color for the part
    AnyColor,
}

/// Ordered and produced quantities of one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProgress {
    /// Color the quantities belong to, or "(all)"
    pub bucket: ColorBucket,
    /// Sum of the order lines routed to this bucket
    pub ordered: SizeVector,
    /// Matched production routed to this bucket
    pub produced: SizeVector,
}

impl ColorProgress {
    /// Pieces ordered for this bucket.
    #[must_use]
    pub const fn ordered_total(&self) -> i64 {
        self.ordered.total()
    }

    /// Pieces produced for this bucket.
    #[must_use]
    pub const fn produced_total(&self) -> i64 {
        self.produced.total()
    }

    /// Pieces still to produce for this bucket.
    #[must_use]
    pub fn shortfall(&self) -> i64 {
        sizes::shortfall(self.ordered_total(), self.produced_total())
    }

    /// Pieces produced beyond what was ordered for this bucket.
    #[must_use]
    pub fn surplus(&self) -> i64 {
        sizes::surplus(self.ordered_total(), self.produced_total())
    }
}

/// Progress of one part within an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartProgress {
    /// Part identifier shared by order lines and production
    pub part_id: String,
    /// Description from the first order line for the part
    pub description: String,
    /// Whether production is routed by color or into "(all)"
    pub matching: PartMatching,
    /// Buckets in first-appearance order of the order lines
    pub colors: Vec<ColorProgress>,
}

impl PartProgress {
    /// Sum of the line totals for the part.
    #[must_use]
    pub fn ordered_total(&self) -> i64 {
        self.colors.iter().map(ColorProgress::ordered_total).sum()
    }

    /// Sum of the matched production totals for the part.
    #[must_use]
    pub fn produced_total(&self) -> i64 {
        self.colors.iter().map(ColorProgress::produced_total).sum()
    }

    /// Pieces still to produce across the part's buckets, from the part totals.
    #[must_use]
    pub fn shortfall(&self) -> i64 {
        sizes::shortfall(self.ordered_total(), self.produced_total())
    }

    /// Pieces produced beyond the part's ordered total.
    #[must_use]
    pub fn surplus(&self) -> i64 {
        sizes::surplus(self.ordered_total(), self.produced_total())
    }

    fn bucket_mut(&mut self, bucket: &ColorBucket) -> Option<&mut ColorProgress> {
        self.colors.iter_mut().find(|c| c.bucket == *bucket)
    }
}

/// Progress of a whole order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderProgress {
    /// Order header
    pub order: order_entity::Model,
    /// Parts in first-appearance order of the order lines
    pub parts: Vec<PartProgress>,
}

impl OrderProgress {
    /// Pieces ordered across every part.
    #[must_use]
    pub fn ordered_total(&self) -> i64 {
        self.parts.iter().map(PartProgress::ordered_total).sum()
    }

    /// Matched pieces produced across every part.
    #[must_use]
    pub fn produced_total(&self) -> i64 {
        self.parts.iter().map(PartProgress::produced_total).sum()
    }

    /// Pieces still to produce, from the order totals.
    #[must_use]
    pub fn shortfall(&self) -> i64 {
        sizes::shortfall(self.ordered_total(), self.produced_total())
    }

    /// Pieces produced beyond the order total.
    #[must_use]
    pub fn surplus(&self) -> i64 {
        sizes::surplus(self.ordered_total(), self.produced_total())
    }

    /// Progress of `part_id`, if the order references it.
    #[must_use]
    pub fn part(&self, part_id: &str) -> Option<&PartProgress> {
        self.parts.iter().find(|p| p.part_id == part_id)
    }
}

/// One row of the fleet-wide progress view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// Order header
    pub order: order_entity::Model,
    /// Pieces ordered
    pub ordered: i64,
    /// Matched pieces produced
    pub produced: i64,
    /// Pieces still to produce
    pub shortfall: i64,
    /// Pieces produced beyond the order
    pub surplus: i64,
    /// Deadline classification on the day the summary was built
    pub delivery_status: DeliveryStatus,
}

impl OrderSummary {
    fn new(progress: &OrderProgress, delivery_status: DeliveryStatus) -> Self {
        Self {
            order: progress.order.clone(),
            ordered: progress.ordered_total(),
            produced: progress.produced_total(),
            shortfall: progress.shortfall(),
            surplus: progress.surplus(),
            delivery_status,
        }
    }
}

/// Matches production against one order.
///
/// Lines of other orders and production made for other customers are ignored,
/// so callers may pass wider slices than needed.
#[must_use]
pub fn match_order(
    order: &order_entity::Model,
    items: &[order_item::Model],
    production: &[finished_good::Model],
) -> OrderProgress {
    let mut parts: Vec<PartProgress> = Vec::new();

    for item in items.iter().filter(|i| i.order_code == order.order_code) {
        let index = match parts.iter().position(|p| p.part_id == item.part_id) {
            Some(index) => index,
            None => {
                parts.push(PartProgress {
                    part_id: item.part_id.clone(),
                    description: item.description.clone(),
                    matching: PartMatching::AnyColor,
                    colors: Vec::new(),
                });
                parts.len() - 1
            }
        };
        let part = &mut parts[index];
        let bucket = ColorBucket::for_color(&item.color);
        match part.bucket_mut(&bucket) {
            Some(existing) => existing.ordered += item.sizes(),
            None => part.colors.push(ColorProgress {
                bucket,
                ordered: item.sizes(),
                produced: SizeVector::default(),
            }),
        }
    }

    for part in &mut parts {
        if part
            .colors
            .iter()
            .any(|c| matches!(c.bucket, ColorBucket::Color(_)))
        {
            part.matching = PartMatching::ByColor;
        }
    }

    let customer_production = production
        .iter()
        .filter(|entry| entry.customer.as_deref() == Some(order.customer.as_str()));
    for entry in customer_production {
        let Some(part) = parts.iter_mut().find(|p| p.part_id == entry.part_id) else {
            continue;
        };
        let bucket = match part.matching {
            PartMatching::ByColor => ColorBucket::Color(entry.color.clone()),
            PartMatching::AnyColor => ColorBucket::AnyColor,
        };
        match part.bucket_mut(&bucket) {
            Some(target) => target.produced += entry.sizes(),
            None => debug!(
                "Production {} in '{}' is outside order {}'s colors for {}",
                entry.id, entry.color, order.order_code, entry.part_id
            ),
        }
    }

    OrderProgress {
        order: order.clone(),
        parts,
    }
}

/// Progress of a single order.
#[instrument(skip(db))]
pub async fn build_order_progress(
    db: &DatabaseConnection,
    order_code: &str,
) -> Result<OrderProgress> {
    let loaded = order::get_order_with_items(db, order_code).await?;
    let part_ids: Vec<String> = loaded
        .items
        .iter()
        .map(|i| i.part_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let production = production::fetch_production_for(
        db,
        std::slice::from_ref(&loaded.order.customer),
        &part_ids,
    )
    .await?;

    Ok(match_order(&loaded.order, &loaded.items, &production))
}

/// Progress summary of every order, newest entry date first.
///
/// Each order is matched on its own: two open orders of one customer for the
/// same part both see that customer's production for the part.
#[instrument(skip(db))]
pub async fn build_fleet_progress(
    db: &DatabaseConnection,
    today: NaiveDate,
    warning_days: i64,
) -> Result<Vec<OrderSummary>> {
    let orders = order::fetch_orders(db, &OrderFilter::default()).await?;
    let codes = orders.iter().map(|o| o.order_code.clone()).collect();
    let items = order::fetch_order_items(db, &ItemFilter::for_orders(codes)).await?;
    let production = production::fetch_production(db).await?;

    let mut items_by_order: HashMap<&str, Vec<order_item::Model>> = HashMap::new();
    for item in &items {
        items_by_order
            .entry(item.order_code.as_str())
            .or_default()
            .push(item.clone());
    }
    let mut production_by_customer: HashMap<&str, Vec<finished_good::Model>> = HashMap::new();
    for entry in &production {
        if let Some(customer) = entry.customer.as_deref() {
            production_by_customer
                .entry(customer)
                .or_default()
                .push(entry.clone());
        }
    }

    let summaries: Vec<OrderSummary> = orders
        .iter()
        .map(|header| {
            let order_items = items_by_order
                .get(header.order_code.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let customer_production = production_by_customer
                .get(header.customer.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let progress = match_order(header, order_items, customer_production);
            let status = deadline::classify_order(header, today, warning_days);
            OrderSummary::new(&progress, status)
        })
        .collect();

    info!("Fleet progress computed for {} order(s)", summaries.len());
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::order::mark_delivered;
    use crate::core::sizes::Size;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[test]
    fn test_blank_colors_collect_all_production() {
        let order = header("ORD-1", "Acme");
        let items = vec![
            line("ORD-1", "A", "", "M=4"),
            line("ORD-1", "A", "", "G=4"),
        ];
        let production = vec![
            produced_for("Acme", "A", "Red", "M=7"),
            produced_for("Acme", "A", "Black", "G=2"),
        ];

        let progress = match_order(&order, &items, &production);
        let part = progress.part("A").unwrap();
        assert_eq!(part.matching, PartMatching::AnyColor);
        assert_eq!(part.colors.len(), 1);
        assert_eq!(part.colors[0].bucket, ColorBucket::AnyColor);
        assert_eq!(part.colors[0].bucket.to_string(), "(all)");
        assert_eq!(part.colors[0].produced_total(), 9);
        assert_eq!(part.ordered_total(), 8);
        assert_eq!(part.surplus(), 1);
        assert_eq!(part.shortfall(), 0);
    }

    #[test]
    fn test_colors_outside_the_order_are_not_counted() {
        let order = header("ORD-1", "Acme");
        let items = vec![line("ORD-1", "A", "Blue", "M=10")];
        let production = vec![
            produced_for("Acme", "A", "Blue", "M=3"),
            produced_for("Acme", "A", "Red", "M=50"),
        ];

        let progress = match_order(&order, &items, &production);
        let part = progress.part("A").unwrap();
        assert_eq!(part.matching, PartMatching::ByColor);
        assert_eq!(part.colors.len(), 1);
        assert_eq!(part.colors[0].produced.get(Size::M), 3);
        assert_eq!(part.produced_total(), 3);
        assert_eq!(part.shortfall(), 7);
    }

    #[test]
    fn test_matching_is_chosen_per_part() {
        let order = header("ORD-1", "Acme");
        let items = vec![
            line("ORD-1", "A", "Blue", "M=2"),
            line("ORD-1", "B", "", "P=5"),
        ];
        let production = vec![
            produced_for("Acme", "A", "Blue", "M=2"),
            produced_for("Acme", "A", "Green", "M=2"),
            produced_for("Acme", "B", "Green", "P=1"),
            produced_for("Acme", "B", "Blue", "P=1"),
        ];

        let progress = match_order(&order, &items, &production);
        let a = progress.part("A").unwrap();
        let b = progress.part("B").unwrap();
        assert_eq!(a.matching, PartMatching::ByColor);
        assert_eq!(a.produced_total(), 2);
        assert_eq!(b.matching, PartMatching::AnyColor);
        assert_eq!(b.produced_total(), 2);
        assert_eq!(progress.ordered_total(), 7);
        assert_eq!(progress.produced_total(), 4);
        assert_eq!(progress.shortfall(), 3);
    }

    #[test]
    fn test_blank_line_in_colored_part_receives_nothing() {
        let order = header("ORD-1", "Acme");
        let items = vec![
            line("ORD-1", "A", "Blue", "M=2"),
            line("ORD-1", "A", "", "M=3"),
        ];
        let production = vec![produced_for("Acme", "A", "Blue", "M=4")];

        let part = match_order(&order, &items, &production).parts.remove(0);
        assert_eq!(part.colors.len(), 2);
        assert_eq!(part.colors[1].bucket, ColorBucket::AnyColor);
        assert_eq!(part.colors[1].ordered_total(), 3);
        assert_eq!(part.colors[1].produced_total(), 0);
        assert_eq!(part.ordered_total(), 5);
        assert_eq!(part.produced_total(), 4);
    }

    #[test]
    fn test_a_color_literally_named_all_is_not_the_fallback() {
        let order = header("ORD-1", "Acme");
        let items = vec![line("ORD-1", "A", "(all)", "M=2")];
        let production = vec![produced_for("Acme", "A", "Red", "M=4")];

        let part = match_order(&order, &items, &production).parts.remove(0);
        assert_eq!(part.colors[0].bucket, ColorBucket::Color("(all)".to_string()));
        assert_eq!(part.produced_total(), 0);
    }

    #[test]
    fn test_only_the_orders_customer_counts() {
        let order = header("ORD-1", "Acme");
        let items = vec![
            line("ORD-1", "A", "", "M=2"),
            line("ORD-2", "A", "", "M=100"),
        ];
        let production = vec![
            produced_for("Beta", "A", "Blue", "M=5"),
            produced("A", "Blue", "M=5"),
            produced_for("Acme", "Z", "Blue", "M=5"),
        ];

        let progress = match_order(&order, &items, &production);
        assert_eq!(progress.ordered_total(), 2);
        assert_eq!(progress.produced_total(), 0);
        assert!(progress.part("Z").is_none());
    }

    #[test]
    fn test_shortfall_and_surplus_are_exclusive() {
        let order = header("ORD-1", "Acme");
        for produced_m in [0, 3, 5, 9] {
            let items = vec![line("ORD-1", "A", "Blue", "M=5")];
            let production = vec![produced_for("Acme", "A", "Blue", &format!("M={produced_m}"))];
            let progress = match_order(&order, &items, &production);
            let bucket = &progress.parts[0].colors[0];
            assert!(bucket.shortfall() == 0 || bucket.surplus() == 0);
            assert_eq!(bucket.shortfall() - bucket.surplus(), 5 - produced_m);
        }
    }

    #[tokio::test]
    async fn test_build_order_progress_from_store() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(
            &db,
            "ORD-1",
            "Acme",
            vec![item("A", "", "M=4"), item("A", "", "G=4")],
        )
        .await?;
        log_test_production(&db, "A", "Red", Some("Acme"), "M=7").await?;
        log_test_production(&db, "A", "Black", Some("Acme"), "G=2").await?;
        log_test_production(&db, "A", "Black", Some("Beta"), "G=20").await?;

        let progress = build_order_progress(&db, "ORD-1").await?;
        assert_eq!(progress.parts.len(), 1);
        assert_eq!(progress.parts[0].colors[0].bucket, ColorBucket::AnyColor);
        assert_eq!(progress.produced_total(), 9);

        let missing = build_order_progress(&db, "NOPE").await;
        assert!(matches!(missing, Err(Error::OrderNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_build_fleet_progress() -> Result<()> {
        let db = setup_test_db().await?;
        let mut first = new_order("Acme", Some("ORD-1"));
        first.entry_date = date(2026, 3, 1);
        first.expected_date = Some(date(2026, 3, 11));
        crate::core::order::create_order(&db, first, vec![item("A", "Blue", "M=5")]).await?;
        let mut second = new_order("Beta", Some("ORD-2"));
        second.entry_date = date(2026, 3, 5);
        crate::core::order::create_order(&db, second, vec![item("B", "", "P=2")]).await?;
        log_test_production(&db, "A", "Blue", Some("Acme"), "M=5").await?;
        log_test_production(&db, "B", "Red", Some("Beta"), "P=1").await?;
        mark_delivered(&db, "ORD-1", date(2026, 3, 12)).await?;

        let fleet = build_fleet_progress(&db, date(2026, 3, 10), 2).await?;
        assert_eq!(fleet.len(), 2);

        assert_eq!(fleet[0].order.order_code, "ORD-2");
        assert_eq!(fleet[0].ordered, 2);
        assert_eq!(fleet[0].produced, 1);
        assert_eq!(fleet[0].shortfall, 1);
        assert_eq!(fleet[0].delivery_status, DeliveryStatus::NoDeadline);

        assert_eq!(fleet[1].order.order_code, "ORD-1");
        assert_eq!(fleet[1].produced, 5);
        assert_eq!(fleet[1].surplus, 0);
        assert_eq!(fleet[1].delivery_status, DeliveryStatus::DeliveredLate);

        // Recomputation on unchanged data is stable
        assert_eq!(build_fleet_progress(&db, date(2026, 3, 10), 2).await?, fleet);
        Ok(())
    }
}
