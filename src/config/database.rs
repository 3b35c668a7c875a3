//! Database connection and table creation.
//!
//! Tables are generated from the entity definitions with `SeaORM`'s
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Statements use `IF NOT EXISTS` so start-up is idempotent against an
//! existing database file.

use crate::entities::{Address, Category, Order, OrderItem, Product, Session, Supplier, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Opens a connection pool for the given `SeaORM` URL.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<()> {
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table the shop needs.
///
/// Referenced tables are created before the tables pointing at them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Address).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, Supplier).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, OrderItem).await?;
    create_table(db, &schema, Session).await?;

    info!("Database tables ensured.");
    Ok(())
}
