//! Supplier business logic - Vendors and their contact details.

use crate::{
    core::{
        pagination::{Page, Pageable, optional_param},
        repository,
        validation::{email, optional_text, required_text},
    },
    entities::{Address, Supplier, supplier},
    errors::Result,
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or replacing a supplier.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    /// Supplier name; required.
    pub name: String,
    /// Contact email; required and unique.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Supplier address.
    pub address_id: i64,
}

/// Search filters, all substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFilter {
    /// Substring of the name.
    #[serde(default, deserialize_with = "optional_param")]
    pub name: Option<String>,
    /// Substring of the email.
    #[serde(default, deserialize_with = "optional_param")]
    pub email: Option<String>,
    /// Substring of the phone number.
    #[serde(default, deserialize_with = "optional_param")]
    pub phone_number: Option<String>,
}

async fn apply(
    db: &DatabaseConnection,
    mut supplier: supplier::ActiveModel,
    input: &SupplierInput,
) -> Result<supplier::ActiveModel> {
    supplier.name = Set(required_text("name", &input.name)?);
    supplier.email = Set(email(&input.email)?);
    supplier.phone_number = Set(optional_text(input.phone_number.as_deref()));
    repository::ensure_reference::<Address, _>(db, input.address_id).await?;
    supplier.address_id = Set(input.address_id);
    Ok(supplier)
}

/// Creates a new supplier at an existing address.
///
/// # Errors
/// Returns an error if a field is invalid, the address does not exist, or the
/// email is already used by another supplier.
#[instrument(skip(db))]
pub async fn create_supplier(
    db: &DatabaseConnection,
    input: SupplierInput,
) -> Result<supplier::Model> {
    let supplier = apply(db, supplier::ActiveModel { ..Default::default() }, &input).await?;
    let created = supplier.insert(db).await?;
    info!(supplier_id = created.id, "Created supplier");
    Ok(created)
}

/// Retrieves a supplier by id.
pub async fn get_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<supplier::Model> {
    repository::find_required::<Supplier, _>(db, supplier_id).await
}

/// Whether a supplier with this id exists.
pub async fn supplier_exists(db: &DatabaseConnection, supplier_id: i64) -> Result<bool> {
    repository::exists::<Supplier, _>(db, supplier_id).await
}

/// Searches suppliers, ordered by id.
pub async fn search_suppliers(
    db: &DatabaseConnection,
    filter: &SupplierFilter,
    pageable: Pageable,
) -> Result<Page<supplier::Model>> {
    let mut condition = Condition::all();
    if let Some(name) = &filter.name {
        condition = condition.add(supplier::Column::Name.contains(name.as_str()));
    }
    if let Some(email) = &filter.email {
        condition = condition.add(supplier::Column::Email.contains(email.to_lowercase()));
    }
    if let Some(phone_number) = &filter.phone_number {
        condition = condition.add(supplier::Column::PhoneNumber.contains(phone_number.as_str()));
    }

    let select = Supplier::find()
        .filter(condition)
        .order_by_asc(supplier::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Replaces every field of an existing supplier.
#[instrument(skip(db))]
pub async fn update_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
    input: SupplierInput,
) -> Result<supplier::Model> {
    let existing: supplier::ActiveModel = get_supplier(db, supplier_id).await?.into();
    let updated = apply(db, existing, &input).await?.update(db).await?;
    info!(supplier_id, "Updated supplier");
    Ok(updated)
}

/// Deletes a supplier.
#[instrument(skip(db))]
pub async fn delete_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<()> {
    repository::delete::<Supplier, _>(db, supplier_id).await?;
    info!(supplier_id, "Deleted supplier");
    Ok(())
}
