//! Shared test utilities for `ProductionBuddy`.
//!
//! Two kinds of helpers live here: store-backed ones that go through the real
//! `core` workflows against an in-memory database, and in-memory model builders
//! for exercising the pure fold functions without a database.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        order::{self, NewOrder, NewOrderItem, OrderWithItems, STATUS_OPEN},
        production::{self, NewProduction, ProductionLaunch},
        sizes::{Size, SizeVector},
    },
    entities::{finished_good, order as order_entity, order_item},
    errors::Result,
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date. Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn sizes(text: &str) -> SizeVector {
    if text.trim().is_empty() {
        SizeVector::default()
    } else {
        text.parse().unwrap()
    }
}

/// Order header input with sensible defaults.
///
/// # Defaults
/// * `entry_date`: 2026-03-01
/// * `expected_date`, `notes`: None
pub fn new_order(customer: &str, order_code: Option<&str>) -> NewOrder {
    NewOrder {
        order_code: order_code.map(str::to_string),
        customer: customer.to_string(),
        entry_date: date(2026, 3, 1),
        expected_date: None,
        notes: None,
    }
}

/// Order line input; `sizes` uses the `PP=1,M=3` notation, blank for all zeros.
pub fn item(part_id: &str, color: &str, sizes_text: &str) -> NewOrderItem {
    NewOrderItem {
        part_id: part_id.to_string(),
        description: format!("Description of {part_id}"),
        color: color.to_string(),
        sizes: sizes(sizes_text),
    }
}

/// Creates an open order through [`order::create_order`].
pub async fn create_test_order(
    db: &DatabaseConnection,
    order_code: &str,
    customer: &str,
    items: Vec<NewOrderItem>,
) -> Result<OrderWithItems> {
    order::create_order(db, new_order(customer, Some(order_code)), items).await
}

/// Production header input with sensible defaults.
pub fn new_production(part_id: &str, customer: Option<&str>) -> NewProduction {
    NewProduction {
        production_date: date(2026, 3, 1),
        cut_code: None,
        part_id: part_id.to_string(),
        description: format!("Description of {part_id}"),
        customer: customer.map(str::to_string),
        notes: None,
    }
}

/// Logs one color of finished goods through [`production::log_production`].
pub async fn log_test_production(
    db: &DatabaseConnection,
    part_id: &str,
    color: &str,
    customer: Option<&str>,
    sizes_text: &str,
) -> Result<Vec<finished_good::Model>> {
    let vector = sizes(sizes_text);
    let launches = Size::ALL
        .into_iter()
        .filter(|size| vector.get(*size) != 0)
        .map(|size| ProductionLaunch {
            color: color.to_string(),
            size,
            quantity: vector.get(size),
        })
        .collect();
    production::log_production(db, new_production(part_id, customer), launches).await
}

/// In-memory open order header.
pub fn header(order_code: &str, customer: &str) -> order_entity::Model {
    order_entity::Model {
        id: 0,
        order_code: order_code.to_string(),
        customer: customer.to_string(),
        entry_date: date(2026, 3, 1),
        expected_date: None,
        delivery_date: None,
        status: STATUS_OPEN.to_string(),
        notes: None,
        created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
}

/// In-memory order line.
pub fn line(order_code: &str, part_id: &str, color: &str, sizes_text: &str) -> order_item::Model {
    let vector = sizes(sizes_text);
    order_item::Model {
        id: 0,
        order_code: order_code.to_string(),
        part_id: part_id.to_string(),
        description: format!("Description of {part_id}"),
        color: color.to_string(),
        qty_pp: vector.pp,
        qty_p: vector.p,
        qty_m: vector.m,
        qty_g: vector.g,
        qty_gg: vector.gg,
        total: vector.total(),
        created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
}

/// In-memory production entry with no customer.
pub fn produced(part_id: &str, color: &str, sizes_text: &str) -> finished_good::Model {
    let vector = sizes(sizes_text);
    finished_good::Model {
        id: 0,
        production_date: date(2026, 3, 1),
        cut_code: None,
        part_id: part_id.to_string(),
        description: format!("Description of {part_id}"),
        color: color.to_string(),
        qty_pp: vector.pp,
        qty_p: vector.p,
        qty_m: vector.m,
        qty_g: vector.g,
        qty_gg: vector.gg,
        total: vector.total(),
        customer: None,
        notes: None,
        created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
}

/// In-memory production entry made for `customer`.
pub fn produced_for(
    customer: &str,
    part_id: &str,
    color: &str,
    sizes_text: &str,
) -> finished_good::Model {
    finished_good::Model {
        customer: Some(customer.to_string()),
        ..produced(part_id, color, sizes_text)
    }
}
