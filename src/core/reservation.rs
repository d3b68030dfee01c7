//! Reservation ledger - open order demand per part, per customer.
//!
//! Reservations answer "how much of this part is promised to whom". They ignore
//! color on purpose: customers may accept a color substitution, so color belongs
//! to progress tracking, not to the reservation view.

use crate::{
    core::order::{self, ItemFilter, OrderFilter},
    entities::{order as order_entity, order_item},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Quantity of a part promised to one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    /// Customer the quantity is promised to
    pub customer: String,
    /// Sum of the totals of that customer's open lines for the part
    pub reserved: i64,
}

/// Reservations for every part with open demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationLedger {
    parts: BTreeMap<String, Vec<Reservation>>,
}

impl ReservationLedger {
    /// Reservations for `part_id`, customers in first-appearance order.
    #[must_use]
    pub fn for_part(&self, part_id: &str) -> &[Reservation] {
        self.parts.get(part_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total reserved across all customers for `part_id`.
    #[must_use]
    pub fn total_for_part(&self, part_id: &str) -> i64 {
        self.for_part(part_id).iter().map(|r| r.reserved).sum()
    }
}

/// Folds open order headers and their items into a reservation ledger.
///
/// The caller supplies only non-delivered headers. Items whose order code has no
/// header among them are skipped.
#[must_use]
pub fn fold_reservations(
    open_orders: &[order_entity::Model],
    open_items: &[order_item::Model],
) -> ReservationLedger {
    let customer_by_order: HashMap<&str, &str> = open_orders
        .iter()
        .map(|o| (o.order_code.as_str(), o.customer.as_str()))
        .collect();

    let mut ledger = ReservationLedger::default();
    for item in open_items {
        let Some(customer) = customer_by_order.get(item.order_code.as_str()) else {
            debug!(
                "Skipping item {} of order {}: no open order header",
                item.id, item.order_code
            );
            continue;
        };

        let reservations = ledger.parts.entry(item.part_id.clone()).or_default();
        match reservations.iter_mut().find(|r| r.customer == *customer) {
            Some(existing) => existing.reserved += item.total,
            None => reservations.push(Reservation {
                customer: (*customer).to_string(),
                reserved: item.total,
            }),
        }
    }
    ledger
}

/// Builds the reservation ledger from every order not yet delivered.
pub async fn build_reservation_ledger(db: &DatabaseConnection) -> Result<ReservationLedger> {
    let open_orders = order::fetch_orders(db, &OrderFilter::not_delivered()).await?;
    let codes = open_orders.iter().map(|o| o.order_code.clone()).collect();
    let open_items = order::fetch_order_items(db, &ItemFilter::for_orders(codes)).await?;

    let ledger = fold_reservations(&open_orders, &open_items);
    debug!(
        "Reservation ledger built from {} open order(s), {} part(s) reserved",
        open_orders.len(),
        ledger.parts.len()
    );
    Ok(ledger)
}
