//! Session entity - A logged-in user's access token.
//!
//! A user holds at most one session; logging in again replaces it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque bearer token handed to the client
    #[sea_orm(unique)]
    pub access_token: String,
    /// ID of the user owning the session
    #[sea_orm(unique)]
    pub user_id: i64,
    /// When the session was issued
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
