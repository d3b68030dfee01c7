//! Cut entity - A cutting batch for one part and color.
//!
//! Cutting batches are descriptive only: they never feed stock or progress,
//! but their colors are offered as suggestions when entering orders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cutting batch database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cuts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Day the batch was cut
    pub cut_date: Date,
    /// Batch code shared by all colors cut together
    pub cut_code: String,
    /// Part being cut
    pub part_id: String,
    /// Part description as entered
    pub description: String,
    /// Fabric color of this row
    pub color: String,
    /// Number of fabric sheets laid for this color
    pub sheets: i64,
    /// Pieces per sheet, size PP
    pub grade_pp: i64,
    /// Pieces per sheet, size P
    pub grade_p: i64,
    /// Pieces per sheet, size M
    pub grade_m: i64,
    /// Pieces per sheet, size G
    pub grade_g: i64,
    /// Pieces per sheet, size GG
    pub grade_gg: i64,
    /// Pieces cut, size PP (grade times sheets)
    pub qty_pp: i64,
    /// Pieces cut, size P
    pub qty_p: i64,
    /// Pieces cut, size M
    pub qty_m: i64,
    /// Pieces cut, size G
    pub qty_g: i64,
    /// Pieces cut, size GG
    pub qty_gg: i64,
    /// Sum of the five piece counts
    pub qty_total: i64,
    /// Free-form notes for the batch
    pub notes: Option<String>,
    /// When the row was stored
    pub created_at: DateTimeUtc,
}

/// `Cut` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
