//! Finished-goods business logic - logging production and reading it back.
//!
//! Operators enter production as a list of (color, size, quantity) launches for a
//! single part. Launches are grouped by color and stored as one row per color,
//! all inside one database transaction.

use crate::{
    core::sizes::{MAX_QUANTITY, Size, SizeVector},
    entities::{FinishedGood, OrderItem, finished_good, order_item},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Fields shared by every row of one production submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduction {
    /// Date the goods were finished
    pub production_date: NaiveDate,
    /// Cutting batch the goods came from
    pub cut_code: Option<String>,
    /// Business code of the part (required)
    pub part_id: String,
    /// Description of the part (required)
    pub description: String,
    /// Customer the goods were made for
    pub customer: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// One operator entry: `quantity` pieces of `size` in `color`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionLaunch {
    /// Color produced (required)
    pub color: String,
    /// Size produced
    pub size: Size,
    /// Pieces produced
    pub quantity: i64,
}

/// Groups launches into one size vector per color, in first-appearance order.
#[must_use]
pub fn group_launches_by_color(launches: &[ProductionLaunch]) -> Vec<(String, SizeVector)> {
    let mut grouped: Vec<(String, SizeVector)> = Vec::new();
    for launch in launches {
        let color = launch.color.trim();
        let sizes = SizeVector::single(launch.size, launch.quantity);
        match grouped.iter_mut().find(|(c, _)| c.as_str() == color) {
            Some((_, existing)) => *existing += sizes,
            None => grouped.push((color.to_string(), sizes)),
        }
    }
    grouped
}

fn validate_production(new_production: &NewProduction, launches: &[ProductionLaunch]) -> Result<()> {
    if new_production.part_id.trim().is_empty() || new_production.description.trim().is_empty() {
        return Err(Error::validation("Part id and description are required"));
    }
    if launches.is_empty() {
        return Err(Error::validation("At least one color/size entry is required"));
    }
    if launches.iter().any(|l| l.color.trim().is_empty()) {
        return Err(Error::validation("Every entry needs a color"));
    }
    if let Some(launch) = launches
        .iter()
        .find(|l| !(0..=MAX_QUANTITY).contains(&l.quantity))
    {
        return Err(Error::InvalidQuantity {
            quantity: launch.quantity,
        });
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Logs finished goods: one row per color, written atomically.
#[instrument(skip(db, launches), fields(part_id = %new_production.part_id))]
pub async fn log_production(
    db: &DatabaseConnection,
    new_production: NewProduction,
    launches: Vec<ProductionLaunch>,
) -> Result<Vec<finished_good::Model>> {
    validate_production(&new_production, &launches)?;

    let grouped = group_launches_by_color(&launches);
    let mut totals = Vec::with_capacity(grouped.len());
    for (_, sizes) in &grouped {
        sizes.ensure_in_range()?;
        totals.push(sizes.checked_total()?);
    }
    let part_id = new_production.part_id.trim().to_string();
    let description = new_production.description.trim().to_string();
    let cut_code = trimmed(new_production.cut_code);
    let customer = trimmed(new_production.customer);
    let notes = trimmed(new_production.notes);
    let now = Utc::now();

    let txn = db.begin().await?;
    let mut rows = Vec::with_capacity(grouped.len());
    for ((color, sizes), total) in grouped.into_iter().zip(totals) {
        let row = finished_good::ActiveModel {
            production_date: Set(new_production.production_date),
            cut_code: Set(cut_code.clone()),
            part_id: Set(part_id.clone()),
            description: Set(description.clone()),
            color: Set(color),
            qty_pp: Set(sizes.pp),
            qty_p: Set(sizes.p),
            qty_m: Set(sizes.m),
            qty_g: Set(sizes.g),
            qty_gg: Set(sizes.gg),
            total: Set(total),
            customer: Set(customer.clone()),
            notes: Set(notes.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        rows.push(row);
    }
    txn.commit().await?;

    info!(
        "Logged {} finished-good row(s) for part {} ({} pieces)",
        rows.len(),
        part_id,
        rows.iter().map(|r| r.total).sum::<i64>()
    );
    Ok(rows)
}

/// Every production entry, in entry order.
pub async fn fetch_production(db: &DatabaseConnection) -> Result<Vec<finished_good::Model>> {
    let rows = FinishedGood::find()
        .order_by_asc(finished_good::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} finished-good row(s)", rows.len());
    Ok(rows)
}

/// Production made for any of `customers` and any of `part_ids`.
///
/// An empty list on either side matches nothing.
pub async fn fetch_production_for(
    db: &DatabaseConnection,
    customers: &[String],
    part_ids: &[String],
) -> Result<Vec<finished_good::Model>> {
    if customers.is_empty() || part_ids.is_empty() {
        return Ok(Vec::new());
    }
    FinishedGood::find()
        .filter(finished_good::Column::Customer.is_in(customers.to_vec()))
        .filter(finished_good::Column::PartId.is_in(part_ids.to_vec()))
        .order_by_asc(finished_good::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Distinct part ids seen in production or orders, sorted. Used for autocomplete.
pub async fn list_part_ids(db: &DatabaseConnection) -> Result<Vec<String>> {
    let produced: Vec<String> = FinishedGood::find()
        .select_only()
        .column(finished_good::Column::PartId)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let ordered: Vec<String> = OrderItem::find()
        .select_only()
        .column(order_item::Column::PartId)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    let ids: BTreeSet<String> = produced.into_iter().chain(ordered).collect();
    Ok(ids.into_iter().collect())
}
