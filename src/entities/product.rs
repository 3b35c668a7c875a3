//! Product entity - Items sold by the shop.
//!
//! Each product belongs to exactly one category and carries a unit price that
//! order items are priced from.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Chew Toy", "Cat Litter 10kg")
    pub name: String,
    /// ID of the category this product is listed under
    pub category_id: i64,
    /// Free-text description
    pub description: Option<String>,
    /// Path or URL of the product image
    pub image_path: Option<String>,
    /// Price per unit
    pub unit_price: f64,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// Order lines referencing this product
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
