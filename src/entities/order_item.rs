//! Order item entity - One product line of an order.
//!
//! An item may exist on its own (`order_id` is `None`) and be attached to an
//! order later. Items are deleted when their order is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier for the order item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the ordered product
    pub product_id: i64,
    /// ID of the order this line belongs to, if any
    pub order_id: Option<i64>,
    /// Number of units (fractional for goods sold by weight)
    pub quantity: f64,
    /// Cost of the whole line
    pub cost: f64,
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each order item may belong to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
