//! User entity - Registered shop customers and administrators.
//!
//! Passwords are stored as argon2 PHC strings in `password_hash`, which is
//! never serialized into API responses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Argon2 hash of the user's password
    #[serde(skip)]
    pub password_hash: String,
    /// Whether the user has administrator rights
    pub is_admin: bool,
    /// When the user registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user places many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// Login sessions of this user
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
