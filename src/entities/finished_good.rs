//! Finished-good entity - One logged batch of finished production.
//!
//! Each row covers a single part and color, broken down by size. The "log
//! finished goods" workflow writes one row per color; rows are never updated
//! or deleted afterwards.

use crate::core::sizes::SizeVector;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finished-good database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finished_goods")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar date the goods were finished
    pub production_date: Date,
    /// Cutting batch the goods came from, if known
    pub cut_code: Option<String>,
    /// Business code of the part (e.g., "CAM-01")
    pub part_id: String,
    /// Free-text description of the part
    pub description: String,
    /// Color produced
    pub color: String,
    /// Quantity of size PP
    pub qty_pp: i64,
    /// Quantity of size P
    pub qty_p: i64,
    /// Quantity of size M
    pub qty_m: i64,
    /// Quantity of size G
    pub qty_g: i64,
    /// Quantity of size GG
    pub qty_gg: i64,
    /// Sum of the five size quantities
    pub total: i64,
    /// Customer the goods were produced for, if any
    pub customer: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Size breakdown of this entry.
    #[must_use]
    pub const fn sizes(&self) -> SizeVector {
        SizeVector::new(self.qty_pp, self.qty_p, self.qty_m, self.qty_g, self.qty_gg)
    }
}

/// `FinishedGood` rows are joined to orders by value, not by foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
