//! Address entity - Postal addresses used for shipping and supplier contact details.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Address database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    /// Unique identifier for the address
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Post office box, required
    pub post_office_box: String,
    /// Street and number
    pub street: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or region
    pub state: Option<String>,
    /// Country, required
    pub country: String,
}

/// Defines relationships between Address and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Suppliers located at this address
    #[sea_orm(has_many = "super::supplier::Entity")]
    Suppliers,
    /// Orders shipped to this address
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
