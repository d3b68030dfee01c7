//! Order entity - The header of a customer order.
//!
//! `status` and `delivery_date` are the only fields that change after creation,
//! and only through the Open -> Delivered transition.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order header database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business key of the order (e.g., "PED-1700000000000")
    #[sea_orm(unique)]
    pub order_code: String,
    /// Customer name
    pub customer: String,
    /// Date the order was entered
    pub entry_date: Date,
    /// Promised delivery date, if one was agreed
    pub expected_date: Option<Date>,
    /// Actual delivery date, set when the order is marked delivered
    pub delivery_date: Option<Date>,
    /// `"Open"`, `"Delivered"` or any free-text status
    pub status: String,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
