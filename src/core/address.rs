//! Address business logic - Creating, finding, searching, updating and deleting addresses.

use crate::{
    core::{
        pagination::{Page, Pageable, optional_param},
        repository,
        validation::{optional_text, required_text},
    },
    entities::{Address, address},
    errors::Result,
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or replacing an address.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    /// Post office box; required.
    pub post_office_box: String,
    /// Street and number.
    #[serde(default)]
    pub street: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country; required.
    pub country: String,
}

/// Search filters; each present filter narrows the result (substring match).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFilter {
    /// Substring of the country.
    #[serde(default, deserialize_with = "optional_param")]
    pub country: Option<String>,
    /// Substring of the state.
    #[serde(default, deserialize_with = "optional_param")]
    pub state: Option<String>,
    /// Substring of the city.
    #[serde(default, deserialize_with = "optional_param")]
    pub city: Option<String>,
    /// Substring of the street.
    #[serde(default, deserialize_with = "optional_param")]
    pub street: Option<String>,
}

fn apply(mut address: address::ActiveModel, input: &AddressInput) -> Result<address::ActiveModel> {
    address.post_office_box = Set(required_text("postOfficeBox", &input.post_office_box)?);
    address.street = Set(optional_text(input.street.as_deref()));
    address.city = Set(optional_text(input.city.as_deref()));
    address.state = Set(optional_text(input.state.as_deref()));
    address.country = Set(required_text("country", &input.country)?);
    Ok(address)
}

/// Creates a new address.
///
/// # Errors
/// Returns an error if `postOfficeBox` or `country` is blank, or the insert fails.
#[instrument(skip(db))]
pub async fn create_address(db: &DatabaseConnection, input: AddressInput) -> Result<address::Model> {
    let address = apply(address::ActiveModel { ..Default::default() }, &input)?;
    let created = address.insert(db).await?;
    info!(address_id = created.id, "Created address");
    Ok(created)
}

/// Retrieves an address by id.
pub async fn get_address(db: &DatabaseConnection, address_id: i64) -> Result<address::Model> {
    repository::find_required::<Address, _>(db, address_id).await
}

/// Whether an address with this id exists.
pub async fn address_exists(db: &DatabaseConnection, address_id: i64) -> Result<bool> {
    repository::exists::<Address, _>(db, address_id).await
}

/// Searches addresses, ordered by id.
pub async fn search_addresses(
    db: &DatabaseConnection,
    filter: &AddressFilter,
    pageable: Pageable,
) -> Result<Page<address::Model>> {
    let mut condition = Condition::all();
    if let Some(country) = &filter.country {
        condition = condition.add(address::Column::Country.contains(country.as_str()));
    }
    if let Some(state) = &filter.state {
        condition = condition.add(address::Column::State.contains(state.as_str()));
    }
    if let Some(city) = &filter.city {
        condition = condition.add(address::Column::City.contains(city.as_str()));
    }
    if let Some(street) = &filter.street {
        condition = condition.add(address::Column::Street.contains(street.as_str()));
    }

    let select = Address::find()
        .filter(condition)
        .order_by_asc(address::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Replaces every field of an existing address.
///
/// # Errors
/// Returns [`crate::errors::Error::NotFound`] if the address does not exist.
#[instrument(skip(db))]
pub async fn update_address(
    db: &DatabaseConnection,
    address_id: i64,
    input: AddressInput,
) -> Result<address::Model> {
    let existing: address::ActiveModel = get_address(db, address_id).await?.into();
    let updated = apply(existing, &input)?.update(db).await?;
    info!(address_id, "Updated address");
    Ok(updated)
}

/// Deletes an address. Fails while suppliers or orders still reference it.
#[instrument(skip(db))]
pub async fn delete_address(db: &DatabaseConnection, address_id: i64) -> Result<()> {
    repository::delete::<Address, _>(db, address_id).await?;
    info!(address_id, "Deleted address");
    Ok(())
}
