//! Order item business logic - Individual product lines.
//!
//! A line's cost defaults to the product's unit price times the quantity when
//! the caller does not state it.

use crate::{
    core::{
        pagination::{Page, Pageable, optional_param},
        repository,
        validation::{amount, quantity},
    },
    entities::{Order, OrderItem, Product, order_item},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or replacing an order item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    /// Product being bought.
    pub product_id: i64,
    /// Order the line belongs to, if any.
    #[serde(default)]
    pub order_id: Option<i64>,
    /// Units of the product.
    pub quantity: f64,
    /// Line cost; defaults to unit price times quantity.
    #[serde(default)]
    pub cost: Option<f64>,
}

/// Search filters, both exact matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemFilter {
    /// Exact order id.
    #[serde(default, deserialize_with = "optional_param")]
    pub order_id: Option<i64>,
    /// Exact product id.
    #[serde(default, deserialize_with = "optional_param")]
    pub product_id: Option<i64>,
}

/// Validates a line against its product and works out its cost.
///
/// Generic over the connection so order creation can price lines inside its
/// transaction.
pub(crate) async fn price_line<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
    units: f64,
    cost: Option<f64>,
) -> Result<(f64, f64)> {
    let units = quantity(units)?;
    let product = repository::find::<Product, _>(db, product_id)
        .await?
        .ok_or(Error::UnknownReference {
            entity: "product",
            id: product_id,
        })?;
    let cost = match cost {
        Some(cost) => amount(cost)?,
        None => amount(product.unit_price * units)?,
    };
    Ok((units, cost))
}

async fn apply(
    db: &DatabaseConnection,
    mut item: order_item::ActiveModel,
    input: &OrderItemInput,
) -> Result<order_item::ActiveModel> {
    let (units, cost) = price_line(db, input.product_id, input.quantity, input.cost).await?;
    if let Some(order_id) = input.order_id {
        repository::ensure_reference::<Order, _>(db, order_id).await?;
    }
    item.product_id = Set(input.product_id);
    item.order_id = Set(input.order_id);
    item.quantity = Set(units);
    item.cost = Set(cost);
    Ok(item)
}

/// Creates an order item, optionally attached to an existing order.
///
/// # Errors
/// Returns an error if the quantity is not positive, the cost is invalid, or
/// the product or order does not exist.
#[instrument(skip(db))]
pub async fn create_order_item(
    db: &DatabaseConnection,
    input: OrderItemInput,
) -> Result<order_item::Model> {
    let item = apply(db, order_item::ActiveModel { ..Default::default() }, &input).await?;
    let created = item.insert(db).await?;
    info!(order_item_id = created.id, "Created order item");
    Ok(created)
}

/// Fetches one order item.
pub async fn get_order_item(
    db: &DatabaseConnection,
    order_item_id: i64,
) -> Result<order_item::Model> {
    repository::find_required::<OrderItem, _>(db, order_item_id).await
}

/// Whether an order item with this id exists.
pub async fn order_item_exists(db: &DatabaseConnection, order_item_id: i64) -> Result<bool> {
    repository::exists::<OrderItem, _>(db, order_item_id).await
}

/// Searches order items, ordered by id.
pub async fn search_order_items(
    db: &DatabaseConnection,
    filter: &OrderItemFilter,
    pageable: Pageable,
) -> Result<Page<order_item::Model>> {
    let mut condition = Condition::all();
    if let Some(order_id) = filter.order_id {
        condition = condition.add(order_item::Column::OrderId.eq(order_id));
    }
    if let Some(product_id) = filter.product_id {
        condition = condition.add(order_item::Column::ProductId.eq(product_id));
    }

    let select = OrderItem::find()
        .filter(condition)
        .order_by_asc(order_item::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Replaces every field of an existing order item.
#[instrument(skip(db))]
pub async fn update_order_item(
    db: &DatabaseConnection,
    order_item_id: i64,
    input: OrderItemInput,
) -> Result<order_item::Model> {
    let existing: order_item::ActiveModel = get_order_item(db, order_item_id).await?.into();
    let updated = apply(db, existing, &input).await?.update(db).await?;
    info!(order_item_id, "Updated order item");
    Ok(updated)
}

/// Deletes one order item.
#[instrument(skip(db))]
pub async fn delete_order_item(db: &DatabaseConnection, order_item_id: i64) -> Result<()> {
    repository::delete::<OrderItem, _>(db, order_item_id).await?;
    info!(order_item_id, "Deleted order item");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn input(product_id: i64, quantity: f64) -> OrderItemInput {
        OrderItemInput {
            product_id,
            order_id: None,
            quantity,
            cost: None,
        }
    }

    #[tokio::test]
    async fn test_cost_defaults_to_unit_price_times_quantity() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;

        let item = create_order_item(&db, input(product.id, 3.0)).await?;
        assert_eq!(item.cost, product.unit_price * 3.0);
        assert_eq!(item.order_id, None);

        let mut discounted = input(product.id, 3.0);
        discounted.cost = Some(1.0);
        let item = create_order_item(&db, discounted).await?;
        assert_eq!(item.cost, 1.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_item_validation() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;

        let zero = create_order_item(&db, input(product.id, 0.0)).await;
        assert!(matches!(zero, Err(Error::Validation { .. })));

        let mut negative_cost = input(product.id, 1.0);
        negative_cost.cost = Some(-2.0);
        assert!(matches!(
            create_order_item(&db, negative_cost).await,
            Err(Error::InvalidAmount { .. })
        ));

        let unknown_product = create_order_item(&db, input(999, 1.0)).await;
        assert!(matches!(
            unknown_product,
            Err(Error::UnknownReference {
                entity: "product",
                id: 999
            })
        ));

        let mut unknown_order = input(product.id, 1.0);
        unknown_order.order_id = Some(77);
        assert!(matches!(
            create_order_item(&db, unknown_order).await,
            Err(Error::UnknownReference {
                entity: "order",
                id: 77
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_search_and_delete_order_items() -> Result<()> {
        let (db, category, product) = setup_with_product().await?;
        let other = create_test_product(&db, "Catnip", category.id, 2.0).await?;
        let first = create_order_item(&db, input(product.id, 1.0)).await?;
        create_order_item(&db, input(other.id, 4.0)).await?;

        let updated = update_order_item(&db, first.id, input(product.id, 2.0)).await?;
        assert_eq!(updated.quantity, 2.0);
        assert_eq!(get_order_item(&db, first.id).await?, updated);

        let filter = OrderItemFilter {
            product_id: Some(other.id),
            ..Default::default()
        };
        let page = search_order_items(&db, &filter, Pageable::new(0, 10)).await?;
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].cost, 8.0);

        delete_order_item(&db, first.id).await?;
        assert!(!order_item_exists(&db, first.id).await?);
        assert!(matches!(
            update_order_item(&db, first.id, input(product.id, 1.0)).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
