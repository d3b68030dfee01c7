//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the four ledgers the reconciliation engine reads:
//! finished goods, order headers, order line items and cutting batches.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cut;
pub mod finished_good;
pub mod order;
pub mod order_item;

// Re-export specific types to avoid conflicts
pub use cut::{Column as CutColumn, Entity as Cut, Model as CutModel};
pub use finished_good::{
    Column as FinishedGoodColumn, Entity as FinishedGood, Model as FinishedGoodModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
