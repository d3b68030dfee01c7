//! Order business logic - creating orders, querying headers and line items,
//! and the single Open -> Delivered transition.
//!
//! Headers and their line items are written together in one database transaction,
//! so a failed submission never leaves a header without its lines. Read helpers
//! take filter structs mirroring the queries the reconciliation builders need.

use crate::{
    core::sizes::SizeVector,
    entities::{Order, OrderItem, order, order_item},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::fmt;
use tracing::{debug, info, instrument};

/// Stored status of an order that has not been delivered yet.
pub const STATUS_OPEN: &str = "Open";
/// Stored status of a delivered order. Terminal.
pub const STATUS_DELIVERED: &str = "Delivered";

/// Order status as stored in the `status` column.
///
/// Anything other than the two well-known values is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Entered, not yet delivered
    Open,
    /// Delivered to the customer
    Delivered,
    /// Free-text status entered by an operator
    Other(String),
}

impl OrderStatus {
    /// Parses the stored column value.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        match value {
            STATUS_OPEN => Self::Open,
            STATUS_DELIVERED => Self::Delivered,
            other => Self::Other(other.to_string()),
        }
    }

    /// The value written to the `status` column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => STATUS_OPEN,
            Self::Delivered => STATUS_DELIVERED,
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl order::Model {
    /// Parsed status of this order.
    #[must_use]
    pub fn order_status(&self) -> OrderStatus {
        OrderStatus::from_stored(&self.status)
    }

    /// True once the order reached the terminal Delivered state.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.status == STATUS_DELIVERED
    }
}

/// Restricts which order headers are fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only orders with exactly this status
    pub status: Option<OrderStatus>,
    /// Only orders whose status differs from this one
    pub status_not: Option<OrderStatus>,
}

impl OrderFilter {
    /// Orders in the Delivered state.
    #[must_use]
    pub const fn delivered() -> Self {
        Self {
            status: Some(OrderStatus::Delivered),
            status_not: None,
        }
    }

    /// Orders in any state other than Delivered.
    #[must_use]
    pub const fn not_delivered() -> Self {
        Self {
            status: None,
            status_not: Some(OrderStatus::Delivered),
        }
    }
}

/// Restricts which order line items are fetched. `None` means "no restriction";
/// an empty list matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Only items belonging to these order codes
    pub order_codes: Option<Vec<String>>,
    /// Only items for these parts
    pub part_ids: Option<Vec<String>>,
    /// Only items whose order belongs to one of these customers
    pub customers: Option<Vec<String>>,
}

impl ItemFilter {
    /// Items of the given orders.
    #[must_use]
    pub const fn for_orders(order_codes: Vec<String>) -> Self {
        Self {
            order_codes: Some(order_codes),
            part_ids: None,
            customers: None,
        }
    }

    fn matches_nothing(&self) -> bool {
        [&self.order_codes, &self.part_ids, &self.customers]
            .into_iter()
            .any(|list| list.as_ref().is_some_and(Vec::is_empty))
    }
}

/// Header fields entered for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Business code; generated when blank
    pub order_code: Option<String>,
    /// Customer name (required)
    pub customer: String,
    /// Date the order was taken
    pub entry_date: NaiveDate,
    /// Promised delivery date
    pub expected_date: Option<NaiveDate>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// One requested part/color of a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    /// Business code of the part (required)
    pub part_id: String,
    /// Description of the part (required)
    pub description: String,
    /// Requested color; blank accepts any color
    pub color: String,
    /// Quantities per size
    pub sizes: SizeVector,
}

/// An order header together with its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithItems {
    /// The header row
    pub order: order::Model,
    /// Line items in entry order
    pub items: Vec<order_item::Model>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_item(index: usize, item: &NewOrderItem) -> Result<()> {
    if item.part_id.trim().is_empty() || item.description.trim().is_empty() {
        return Err(Error::validation(format!(
            "Item {} needs a part id and a description",
            index + 1
        )));
    }
    item.sizes.ensure_in_range()?;
    item.sizes.checked_total()?;
    Ok(())
}

fn validate_new_order(new_order: &NewOrder, items: &[NewOrderItem]) -> Result<()> {
    if new_order.customer.trim().is_empty() {
        return Err(Error::validation("Customer is required"));
    }
    if items.is_empty() {
        return Err(Error::validation("An order needs at least one item"));
    }
    for (index, item) in items.iter().enumerate() {
        validate_item(index, item)?;
    }
    Ok(())
}

fn item_row(
    order_code: &str,
    item: NewOrderItem,
    now: DateTimeUtc,
) -> Result<order_item::ActiveModel> {
    let sizes = item.sizes;
    Ok(order_item::ActiveModel {
        order_code: Set(order_code.to_string()),
        part_id: Set(item.part_id.trim().to_string()),
        description: Set(item.description.trim().to_string()),
        color: Set(item.color.trim().to_string()),
        qty_pp: Set(sizes.pp),
        qty_p: Set(sizes.p),
        qty_m: Set(sizes.m),
        qty_g: Set(sizes.g),
        qty_gg: Set(sizes.gg),
        total: Set(sizes.checked_total()?),
        created_at: Set(now),
        ..Default::default()
    })
}

/// Generates an order code from the current time, e.g. `PED-1700000000000`.
#[must_use]
pub fn generate_order_code() -> String {
    format!("PED-{}", Utc::now().timestamp_millis())
}

/// Creates an order header and all of its line items atomically.
///
/// Required fields are checked before any store call. A blank order code is
/// replaced by [`generate_order_code`]. Each line's `total` is computed from its
/// size vector.
#[instrument(skip(db, items), fields(customer = %new_order.customer, items = items.len()))]
pub async fn create_order(
    db: &DatabaseConnection,
    new_order: NewOrder,
    items: Vec<NewOrderItem>,
) -> Result<OrderWithItems> {
    validate_new_order(&new_order, &items)?;

    let order_code = non_blank(new_order.order_code).unwrap_or_else(generate_order_code);
    let now = Utc::now();

    let txn = db.begin().await?;

    let header = order::ActiveModel {
        order_code: Set(order_code.clone()),
        customer: Set(new_order.customer.trim().to_string()),
        entry_date: Set(new_order.entry_date),
        expected_date: Set(new_order.expected_date),
        delivery_date: Set(None),
        status: Set(STATUS_OPEN.to_string()),
        notes: Set(non_blank(new_order.notes)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        let row = item_row(&order_code, item, now)?.insert(&txn).await?;
        inserted.push(row);
    }

    txn.commit().await?;

    info!(
        "Created order {} for {} with {} item(s)",
        header.order_code,
        header.customer,
        inserted.len()
    );
    Ok(OrderWithItems {
        order: header,
        items: inserted,
    })
}

/// Appends one line to an order that has not been delivered yet.
///
/// Fails with [`Error::OrderNotFound`] for an unknown code and
/// [`Error::AlreadyDelivered`] once the order is delivered.
#[instrument(skip(db, item), fields(part_id = %item.part_id))]
pub async fn add_order_item(
    db: &DatabaseConnection,
    order_code: &str,
    item: NewOrderItem,
) -> Result<order_item::Model> {
    validate_item(0, &item)?;

    let order = get_order_by_code(db, order_code)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            code: order_code.to_string(),
        })?;
    if order.is_delivered() {
        return Err(Error::AlreadyDelivered {
            code: order.order_code,
        });
    }

    let row = item_row(&order.order_code, item, Utc::now())?.insert(db).await?;
    info!(
        "Added {} x {} ({}) to order {}",
        row.total,
        row.part_id,
        if row.color.is_empty() { "any color" } else { row.color.as_str() },
        order.order_code
    );
    Ok(row)
}

/// Finds an order header by its business code.
pub async fn get_order_by_code(
    db: &DatabaseConnection,
    order_code: &str,
) -> Result<Option<order::Model>> {
    Order::find()
        .filter(order::Column::OrderCode.eq(order_code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fetches order headers, newest entry date first.
pub async fn fetch_orders(db: &DatabaseConnection, filter: &OrderFilter) -> Result<Vec<order::Model>> {
    let mut query = Order::find();
    if let Some(status) = &filter.status {
        query = query.filter(order::Column::Status.eq(status.as_str()));
    }
    if let Some(status) = &filter.status_not {
        query = query.filter(order::Column::Status.ne(status.as_str()));
    }

    let orders = query
        .order_by_desc(order::Column::EntryDate)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} order header(s) with {:?}", orders.len(), filter);
    Ok(orders)
}

/// Fetches order line items in entry order.
pub async fn fetch_order_items(
    db: &DatabaseConnection,
    filter: &ItemFilter,
) -> Result<Vec<order_item::Model>> {
    if filter.matches_nothing() {
        return Ok(Vec::new());
    }

    let mut query = OrderItem::find();
    if let Some(codes) = &filter.order_codes {
        query = query.filter(order_item::Column::OrderCode.is_in(codes.clone()));
    }
    if let Some(part_ids) = &filter.part_ids {
        query = query.filter(order_item::Column::PartId.is_in(part_ids.clone()));
    }
    if let Some(customers) = &filter.customers {
        let codes: Vec<String> = Order::find()
            .select_only()
            .column(order::Column::OrderCode)
            .filter(order::Column::Customer.is_in(customers.clone()))
            .into_tuple()
            .all(db)
            .await?;
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        query = query.filter(order_item::Column::OrderCode.is_in(codes));
    }

    let items = query.order_by_asc(order_item::Column::Id).all(db).await?;
    debug!("Fetched {} order item(s)", items.len());
    Ok(items)
}

/// Loads an order with its items.
pub async fn get_order_with_items(
    db: &DatabaseConnection,
    order_code: &str,
) -> Result<OrderWithItems> {
    let order = get_order_by_code(db, order_code)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            code: order_code.to_string(),
        })?;
    let items = fetch_order_items(db, &ItemFilter::for_orders(vec![order.order_code.clone()])).await?;
    Ok(OrderWithItems { order, items })
}

/// Flips an order to Delivered and records its delivery date.
///
/// This is a single conditional update, so concurrent readers see either the
/// old or the new status. Fails with [`Error::OrderNotFound`] for an unknown code
/// and [`Error::AlreadyDelivered`] when the order is already delivered.
#[instrument(skip(db))]
pub async fn mark_delivered(
    db: &DatabaseConnection,
    order_code: &str,
    delivery_date: NaiveDate,
) -> Result<order::Model> {
    let result = Order::update_many()
        .col_expr(order::Column::Status, Expr::value(STATUS_DELIVERED))
        .col_expr(order::Column::DeliveryDate, Expr::value(delivery_date))
        .filter(order::Column::OrderCode.eq(order_code))
        .filter(order::Column::Status.ne(STATUS_DELIVERED))
        .exec(db)
        .await?;

    let order = get_order_by_code(db, order_code)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            code: order_code.to_string(),
        })?;

    if result.rows_affected == 0 {
        return Err(Error::AlreadyDelivered {
            code: order_code.to_string(),
        });
    }

    info!("Order {order_code} marked delivered on {delivery_date}");
    Ok(order)
}

/// All order codes, sorted. Used for autocomplete.
pub async fn list_order_codes(db: &DatabaseConnection) -> Result<Vec<String>> {
    Order::find()
        .select_only()
        .column(order::Column::OrderCode)
        .order_by_asc(order::Column::OrderCode)
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_order_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Missing customer
        let mut header = new_order("", None);
        let result = create_order(&db, header.clone(), vec![item("CAM-01", "Blue", "M=1")]).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // No items
        header.customer = "Acme".to_string();
        let result = create_order(&db, header.clone(), Vec::new()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Item without a part id
        let result = create_order(&db, header.clone(), vec![item(" ", "Blue", "M=1")]).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Negative quantity
        let mut bad = item("CAM-01", "Blue", "");
        bad.sizes.m = -3;
        let result = create_order(&db, header, vec![bad]).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { quantity: -3 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_out_of_range_quantities() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut huge = item("CAM-01", "Blue", "P=1");
        huge.sizes.m = i64::MAX;
        let result = create_order(&db, new_order("Acme", None), vec![huge]).await;
        assert!(matches!(
            result,
            Err(Error::InvalidQuantity {
                quantity: i64::MAX
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_order_item() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db, "ORD-1", "Acme", vec![item("CAM-01", "Blue", "M=1")]).await?;

        let added = add_order_item(&db, "ORD-1", item("CAL-02", " Red ", "G=3")).await?;
        assert_eq!(added.order_code, "ORD-1");
        assert_eq!(added.color, "Red");
        assert_eq!(added.total, 3);
        assert_eq!(get_order_with_items(&db, "ORD-1").await?.items.len(), 2);

        let missing = add_order_item(&db, "NOPE", item("CAL-02", "", "G=1")).await;
        assert!(matches!(missing, Err(Error::OrderNotFound { .. })));

        mark_delivered(&db, "ORD-1", date(2026, 3, 2)).await?;
        let closed = add_order_item(&db, "ORD-1", item("CAL-02", "", "G=1")).await;
        assert!(matches!(closed, Err(Error::AlreadyDelivered { .. })));
        assert_eq!(get_order_with_items(&db, "ORD-1").await?.items.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_writes_header_and_items() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_order(
            &db,
            new_order("Acme", Some("ORD-1")),
            vec![item("CAM-01", " Blue ", "PP=1,M=3"), item("CAL-02", "", "G=2")],
        )
        .await?;

        assert_eq!(created.order.order_code, "ORD-1");
        assert_eq!(created.order.status, STATUS_OPEN);
        assert_eq!(created.order.delivery_date, None);
        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].color, "Blue");
        assert_eq!(created.items[0].total, 4);
        assert_eq!(created.items[1].color, "");
        assert_eq!(created.items[1].total, 2);

        let loaded = get_order_with_items(&db, "ORD-1").await?;
        assert_eq!(loaded, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_generates_code_when_blank() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_order(
            &db,
            new_order("Acme", Some("  ")),
            vec![item("CAM-01", "Blue", "M=1")],
        )
        .await?;

        assert!(created.order.order_code.starts_with("PED-"));
        assert_eq!(created.items[0].order_code, created.order.order_code);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_order_code_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db, "ORD-1", "Acme", vec![item("CAM-01", "Blue", "M=1")]).await?;

        let result = create_order(
            &db,
            new_order("Other", Some("ORD-1")),
            vec![item("CAL-02", "Red", "G=5")],
        )
        .await;
        assert!(matches!(result, Err(Error::Database(_))));

        // The failed submission left no stray line items behind
        let items = fetch_order_items(&db, &ItemFilter::default()).await?;
        assert_eq!(items.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_orders_by_status() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db, "ORD-1", "Acme", vec![item("CAM-01", "Blue", "M=1")]).await?;
        create_test_order(&db, "ORD-2", "Beta", vec![item("CAM-01", "Red", "M=1")]).await?;
        mark_delivered(&db, "ORD-2", date(2026, 3, 2)).await?;

        let delivered = fetch_orders(&db, &OrderFilter::delivered()).await?;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].order_code, "ORD-2");

        let open = fetch_orders(&db, &OrderFilter::not_delivered()).await?;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].order_code, "ORD-1");

        let all = fetch_orders(&db, &OrderFilter::default()).await?;
        assert_eq!(all.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_order_items_filters() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(
            &db,
            "ORD-1",
            "Acme",
            vec![item("CAM-01", "Blue", "M=1"), item("CAL-02", "Blue", "M=2")],
        )
        .await?;
        create_test_order(&db, "ORD-2", "Beta", vec![item("CAM-01", "Red", "M=3")]).await?;

        let by_part = fetch_order_items(
            &db,
            &ItemFilter {
                part_ids: Some(vec!["CAM-01".to_string()]),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_part.len(), 2);

        let by_customer = fetch_order_items(
            &db,
            &ItemFilter {
                customers: Some(vec!["Beta".to_string()]),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_customer.len(), 1);
        assert_eq!(by_customer[0].order_code, "ORD-2");

        let nothing = fetch_order_items(&db, &ItemFilter::for_orders(Vec::new())).await?;
        assert!(nothing.is_empty());

        let unknown_customer = fetch_order_items(
            &db,
            &ItemFilter {
                customers: Some(vec!["Nobody".to_string()]),
                ..Default::default()
            },
        )
        .await?;
        assert!(unknown_customer.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_delivered_transition() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db, "ORD-1", "Acme", vec![item("CAM-01", "Blue", "M=1")]).await?;

        let delivered = mark_delivered(&db, "ORD-1", date(2026, 3, 2)).await?;
        assert!(delivered.is_delivered());
        assert_eq!(delivered.order_status(), OrderStatus::Delivered);
        assert_eq!(delivered.delivery_date, Some(date(2026, 3, 2)));

        // Delivered is terminal
        let again = mark_delivered(&db, "ORD-1", date(2026, 3, 9)).await;
        assert!(matches!(again, Err(Error::AlreadyDelivered { .. })));
        let unchanged = get_order_by_code(&db, "ORD-1").await?.unwrap();
        assert_eq!(unchanged.delivery_date, Some(date(2026, 3, 2)));

        let missing = mark_delivered(&db, "NOPE", date(2026, 3, 2)).await;
        assert!(matches!(missing, Err(Error::OrderNotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_order_status_round_trip() {
        assert_eq!(OrderStatus::from_stored("Open"), OrderStatus::Open);
        assert_eq!(OrderStatus::from_stored("Delivered"), OrderStatus::Delivered);
        assert_eq!(
            OrderStatus::from_stored("On hold"),
            OrderStatus::Other("On hold".to_string())
        );
        assert_eq!(OrderStatus::Other("On hold".to_string()).as_str(), "On hold");
    }

    #[tokio::test]
    async fn test_list_order_codes_sorted() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db, "ORD-2", "Acme", vec![item("CAM-01", "Blue", "M=1")]).await?;
        create_test_order(&db, "ORD-1", "Acme", vec![item("CAM-01", "Blue", "M=1")]).await?;

        assert_eq!(list_order_codes(&db).await?, vec!["ORD-1", "ORD-2"]);
        Ok(())
    }
}
