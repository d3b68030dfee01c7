//! Core business logic, independent of Discord.
//!
//! The store-backed workflows (`order`, `production`, `cut`) write rows; the
//! ledger builders (`stock`, `reservation`, `progress`) and the `deadline`
//! classifier derive every view from those rows on each call and keep no state.

/// Cutting batches
pub mod cut;
/// Delivery-status classification
pub mod deadline;
/// Orders and their line items
pub mod order;
/// Finished-goods entries
pub mod production;
/// Ordered vs produced matching per order
pub mod progress;
/// Text formatting of ledgers and progress
pub mod report;
/// Open-order demand per part and customer
pub mod reservation;
/// Size labels and size vectors
pub mod sizes;
/// Netted stock per part and color
pub mod stock;
