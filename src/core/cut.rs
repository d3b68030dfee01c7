//! Cutting batch business logic.
//!
//! A cutting batch lays a number of fabric sheets per color; each sheet yields a
//! fixed grade of pieces per size. Batches are descriptive only and never enter
//! the stock or progress calculations.

use crate::{
    core::sizes::{MAX_QUANTITY, SizeVector},
    entities::{Cut, cut},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Fields shared by every color of one cutting batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCut {
    /// Date the sheets were cut
    pub cut_date: NaiveDate,
    /// Batch code (required)
    pub cut_code: String,
    /// Business code of the part (required)
    pub part_id: String,
    /// Description of the part (required)
    pub description: String,
    /// Pieces per sheet for each size
    pub grade: SizeVector,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Sheets laid for one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutColor {
    /// Fabric color (required)
    pub color: String,
    /// Number of sheets laid in this color
    pub sheets: i64,
}

fn validate_cut(new_cut: &NewCut, colors: &[CutColor]) -> Result<()> {
    if new_cut.cut_code.trim().is_empty()
        || new_cut.part_id.trim().is_empty()
        || new_cut.description.trim().is_empty()
    {
        return Err(Error::validation(
            "Cut code, part id and description are required",
        ));
    }
    if colors.is_empty() || colors.iter().any(|c| c.color.trim().is_empty()) {
        return Err(Error::validation("Every cut needs at least one named color"));
    }
    new_cut.grade.ensure_in_range()?;
    if let Some(color) = colors
        .iter()
        .find(|c| !(0..=MAX_QUANTITY).contains(&c.sheets))
    {
        return Err(Error::InvalidQuantity {
            quantity: color.sheets,
        });
    }
    Ok(())
}

/// Records a cutting batch, one row per color, in a single transaction.
///
/// Quantities per color are the grade multiplied by the sheets laid.
#[instrument(skip(db, colors), fields(cut_code = %new_cut.cut_code))]
pub async fn log_cut(
    db: &DatabaseConnection,
    new_cut: NewCut,
    colors: Vec<CutColor>,
) -> Result<Vec<cut::Model>> {
    validate_cut(&new_cut, &colors)?;

    let grade = new_cut.grade;
    let notes = new_cut
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let now = Utc::now();

    let mut batches = Vec::with_capacity(colors.len());
    for CutColor { color, sheets } in colors {
        let quantities = grade.scaled(sheets)?;
        let total = quantities.checked_total()?;
        batches.push((color, sheets, quantities, total));
    }

    let txn = db.begin().await?;
    let mut rows = Vec::with_capacity(batches.len());
    for (color, sheets, quantities, total) in batches {
        let row = cut::ActiveModel {
            cut_date: Set(new_cut.cut_date),
            cut_code: Set(new_cut.cut_code.trim().to_string()),
            part_id: Set(new_cut.part_id.trim().to_string()),
            description: Set(new_cut.description.trim().to_string()),
            color: Set(color.trim().to_string()),
            sheets: Set(sheets),
            grade_pp: Set(grade.pp),
            grade_p: Set(grade.p),
            grade_m: Set(grade.m),
            grade_g: Set(grade.g),
            grade_gg: Set(grade.gg),
            qty_pp: Set(quantities.pp),
            qty_p: Set(quantities.p),
            qty_m: Set(quantities.m),
            qty_g: Set(quantities.g),
            qty_gg: Set(quantities.gg),
            qty_total: Set(total),
            notes: Set(notes.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        rows.push(row);
    }
    txn.commit().await?;

    info!("Logged cut {} with {} color(s)", new_cut.cut_code, rows.len());
    Ok(rows)
}

/// Distinct colors seen in cutting batches, sorted.
pub async fn list_colors(db: &DatabaseConnection) -> Result<Vec<String>> {
    Cut::find()
        .select_only()
        .column(cut::Column::Color)
        .distinct()
        .order_by_asc(cut::Column::Color)
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}
