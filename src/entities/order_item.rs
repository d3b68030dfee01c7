//! Order item entity - One requested part/color of an order, broken down by size.
//!
//! Items are created together with their header and never change afterwards.
//! An empty `color` means the customer accepts any color.

use crate::core::sizes::SizeVector;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Code of the order this item belongs to
    pub order_code: String,
    /// Business code of the part
    pub part_id: String,
    /// Free-text description of the part
    pub description: String,
    /// Requested color, empty when any color is accepted
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
    /// When the row was written
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Size breakdown of this line.
    #[must_use]
    pub const fn sizes(&self) -> SizeVector {
        SizeVector::new(self.qty_pp, self.qty_p, self.qty_m, self.qty_g, self.qty_gg)
    }
}

/// Defines relationships between `OrderItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one order, joined on the business code
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderCode",
        to = "super::order::Column::OrderCode"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
