//! Order business logic - Placing, amending and removing orders.
//!
//! An order can be placed together with its lines. The order row and every
//! line are written in one transaction, so a bad line leaves nothing behind.
//! Deleting an order removes its lines as well.

use crate::{
    core::{
        order_item::price_line,
        pagination::{Page, Pageable, optional_param},
        repository,
        validation::amount,
    },
    entities::{Address, Order, OrderItem, User, order, order_item},
    errors::Result,
};
use chrono::{Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One line of a new order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    /// Product being bought.
    pub product_id: i64,
    /// Units of the product.
    pub quantity: f64,
    /// Line cost; defaults to unit price times quantity.
    #[serde(default)]
    pub cost: Option<f64>,
}

/// Fields accepted when placing an order.
///
/// Without an explicit `cost` the order costs the sum of its lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    /// Order cost; defaults to the sum of the item costs.
    #[serde(default)]
    pub cost: Option<f64>,
    /// User placing the order.
    pub buyer_id: i64,
    /// Shipping fee, zero when absent.
    #[serde(default)]
    pub shipping_fee: f64,
    /// Whether the order has been delivered.
    #[serde(default)]
    pub delivered_status: bool,
    /// Delivery address.
    pub shipping_address_id: i64,
    /// Lines created together with the order.
    #[serde(default)]
    pub items: Vec<OrderLineInput>,
}

/// Fields accepted when updating an order. `placedOn` cannot be changed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    /// Order cost.
    pub cost: f64,
    /// User the order belongs to.
    pub buyer_id: i64,
    /// Shipping fee.
    pub shipping_fee: f64,
    /// Whether the order has been delivered.
    pub delivered_status: bool,
    /// Delivery address.
    pub shipping_address_id: i64,
}

/// An order together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    /// The order row.
    #[serde(flatten)]
    pub order: order::Model,
    /// Its items, ordered by id.
    pub items: Vec<order_item::Model>,
}

/// Search filters for orders.
///
/// `placedAfter` and `placedBefore` are calendar days (`YYYY-MM-DD`) and both
/// include the named day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    /// Exact buyer id.
    #[serde(default, deserialize_with = "optional_param")]
    pub buyer_id: Option<i64>,
    /// Placed on or after this day.
    #[serde(default, deserialize_with = "optional_param")]
    pub placed_after: Option<NaiveDate>,
    /// Placed on or before this day.
    #[serde(default, deserialize_with = "optional_param")]
    pub placed_before: Option<NaiveDate>,
    /// Delivery status.
    #[serde(default, deserialize_with = "optional_param")]
    pub delivered: Option<bool>,
}

impl OrderFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(buyer_id) = self.buyer_id {
            condition = condition.add(order::Column::BuyerId.eq(buyer_id));
        }
        if let Some(day) = self.placed_after {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            condition = condition.add(order::Column::PlacedOn.gte(start));
        }
        if let Some(day) = self.placed_before {
            // A missing next day means the bound is past any stored timestamp.
            if let Some(next_day) = day.checked_add_days(Days::new(1)) {
                let end = next_day.and_time(NaiveTime::MIN).and_utc();
                condition = condition.add(order::Column::PlacedOn.lt(end));
            }
        }
        if let Some(delivered) = self.delivered {
            condition = condition.add(order::Column::DeliveredStatus.eq(delivered));
        }
        condition
    }
}

async fn ensure_parties<C: ConnectionTrait>(db: &C, buyer_id: i64, address_id: i64) -> Result<()> {
    repository::ensure_reference::<User, _>(db, buyer_id).await?;
    repository::ensure_reference::<Address, _>(db, address_id).await
}

/// Places an order and its lines atomically.
///
/// # Errors
/// Returns an error if:
/// - The buyer or shipping address does not exist
/// - A line names an unknown product or has an invalid quantity or cost
/// - The cost or shipping fee is negative or not finite
#[instrument(skip(db, input), fields(buyer_id = input.buyer_id, lines = input.items.len()))]
pub async fn create_order(db: &DatabaseConnection, input: OrderInput) -> Result<OrderDetails> {
    let shipping_fee = amount(input.shipping_fee)?;
    let txn = db.begin().await?;

    ensure_parties(&txn, input.buyer_id, input.shipping_address_id).await?;

    let mut lines = Vec::with_capacity(input.items.len());
    for line in &input.items {
        let (units, cost) = price_line(&txn, line.product_id, line.quantity, line.cost).await?;
        lines.push((line.product_id, units, cost));
    }
    let cost = match input.cost {
        Some(cost) => amount(cost)?,
        None => amount(lines.iter().map(|(_, _, cost)| cost).sum())?,
    };

    let order = order::ActiveModel {
        cost: Set(cost),
        buyer_id: Set(input.buyer_id),
        placed_on: Set(Utc::now()),
        shipping_fee: Set(shipping_fee),
        delivered_status: Set(input.delivered_status),
        shipping_address_id: Set(input.shipping_address_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (product_id, units, cost) in lines {
        let item = order_item::ActiveModel {
            product_id: Set(product_id),
            order_id: Set(Some(order.id)),
            quantity: Set(units),
            cost: Set(cost),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    txn.commit().await?;
    info!(order_id = order.id, "Placed order");
    Ok(OrderDetails { order, items })
}

/// Retrieves an order with its lines, ordered by line id.
pub async fn get_order(db: &DatabaseConnection, order_id: i64) -> Result<OrderDetails> {
    let order = repository::find_required::<Order, _>(db, order_id).await?;
    let items = order
        .find_related(OrderItem)
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await?;
    debug!(order_id, lines = items.len(), "Loaded order");
    Ok(OrderDetails { order, items })
}

/// Whether an order with this id exists.
pub async fn order_exists(db: &DatabaseConnection, order_id: i64) -> Result<bool> {
    repository::exists::<Order, _>(db, order_id).await
}

/// Searches orders, ordered by id. Lines are not included.
pub async fn search_orders(
    db: &DatabaseConnection,
    filter: &OrderFilter,
    pageable: Pageable,
) -> Result<Page<order::Model>> {
    let select = Order::find()
        .filter(filter.condition())
        .order_by_asc(order::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Updates an order's header fields. Lines are managed through order items.
#[instrument(skip(db))]
pub async fn update_order(
    db: &DatabaseConnection,
    order_id: i64,
    input: OrderUpdate,
) -> Result<order::Model> {
    let mut order: order::ActiveModel = repository::find_required::<Order, _>(db, order_id)
        .await?
        .into();
    ensure_parties(db, input.buyer_id, input.shipping_address_id).await?;
    order.cost = Set(amount(input.cost)?);
    order.shipping_fee = Set(amount(input.shipping_fee)?);
    order.buyer_id = Set(input.buyer_id);
    order.delivered_status = Set(input.delivered_status);
    order.shipping_address_id = Set(input.shipping_address_id);

    let updated = order.update(db).await?;
    info!(order_id, delivered = updated.delivered_status, "Updated order");
    Ok(updated)
}

/// Deletes an order and all of its lines.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let removed = OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    repository::delete::<Order, _>(&txn, order_id).await?;
    txn.commit().await?;

    info!(order_id, lines = removed.rows_affected, "Deleted order");
    Ok(())
}
