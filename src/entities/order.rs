//! Order entity - A purchase placed by a user and shipped to an address.
//!
//! `placed_on` is stamped when the order is created and is never changed by updates.
//! Order lines live in the `order_items` table and are removed together with the order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Total cost of the goods
    pub cost: f64,
    /// ID of the user who placed the order
    pub buyer_id: i64,
    /// When the order was placed
    pub placed_on: DateTimeUtc,
    /// Shipping fee charged on top of the items
    pub shipping_fee: f64,
    /// Whether the order has been delivered
    pub delivered_status: bool,
    /// ID of the address the order ships to
    pub shipping_address_id: i64,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order is placed by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
    /// Each order ships to one address
    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::ShippingAddressId",
        to = "super::address::Column::Id"
    )]
    ShippingAddress,
    /// One order has many order items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingAddress.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
