//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, searching, updating and
//! deleting products. Every product is listed under an existing category and carries a
//! unit price that order items are priced from. All functions are async and return
//! Result types for proper error handling throughout the system.

use crate::{
    core::{
        pagination::{Page, Pageable, optional_param},
        repository,
        validation::{amount, optional_text, required_text},
    },
    entities::{Category, Product, product},
    errors::Result,
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Product name; required.
    pub name: String,
    /// Category the product is listed under.
    pub category_id: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Path or URL of the product image.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Price of one unit; not negative.
    pub unit_price: f64,
}

/// Search filters for products.
///
/// `name` and `description` match substrings. The price bounds are strict;
/// giving both selects the open range between them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Substring of the name.
    #[serde(default, deserialize_with = "optional_param")]
    pub name: Option<String>,
    /// Substring of the description.
    #[serde(default, deserialize_with = "optional_param")]
    pub description: Option<String>,
    /// Exact category id.
    #[serde(default, deserialize_with = "optional_param")]
    pub category_id: Option<i64>,
    /// Exact unit price.
    #[serde(default, deserialize_with = "optional_param")]
    pub unit_price_equals: Option<f64>,
    /// Unit price strictly below this.
    #[serde(default, deserialize_with = "optional_param")]
    pub unit_price_less_than: Option<f64>,
    /// Unit price strictly above this.
    #[serde(default, deserialize_with = "optional_param")]
    pub unit_price_greater_than: Option<f64>,
}

impl ProductFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(name) = &self.name {
            condition = condition.add(product::Column::Name.contains(name.as_str()));
        }
        if let Some(description) = &self.description {
            condition = condition.add(product::Column::Description.contains(description.as_str()));
        }
        if let Some(category_id) = self.category_id {
            condition = condition.add(product::Column::CategoryId.eq(category_id));
        }
        if let Some(price) = self.unit_price_equals {
            condition = condition.add(product::Column::UnitPrice.eq(price));
        }
        if let Some(price) = self.unit_price_less_than {
            condition = condition.add(product::Column::UnitPrice.lt(price));
        }
        if let Some(price) = self.unit_price_greater_than {
            condition = condition.add(product::Column::UnitPrice.gt(price));
        }
        condition
    }
}

async fn apply(
    db: &DatabaseConnection,
    mut product: product::ActiveModel,
    input: &ProductInput,
) -> Result<product::ActiveModel> {
    product.name = Set(required_text("name", &input.name)?);
    product.unit_price = Set(amount(input.unit_price)?);
    product.description = Set(optional_text(input.description.as_deref()));
    product.image_path = Set(optional_text(input.image_path.as_deref()));
    repository::ensure_reference::<Category, _>(db, input.category_id).await?;
    product.category_id = Set(input.category_id);
    Ok(product)
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The category does not exist
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model> {
    let product = apply(db, product::ActiveModel { ..Default::default() }, &input).await?;
    let created = product.insert(db).await?;
    info!(product_id = created.id, "Created product");
    Ok(created)
}

/// Retrieves a specific product by its unique ID.
///
/// # Errors
/// Returns [`crate::errors::Error::NotFound`] if no product has this id.
pub async fn get_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    repository::find_required::<Product, _>(db, product_id).await
}

/// Whether a product with this id exists.
pub async fn product_exists(db: &DatabaseConnection, product_id: i64) -> Result<bool> {
    repository::exists::<Product, _>(db, product_id).await
}

/// Searches products, ordered by id. Filters are combined; no filter returns everything.
pub async fn search_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
    pageable: Pageable,
) -> Result<Page<product::Model>> {
    let select = Product::find()
        .filter(filter.condition())
        .order_by_asc(product::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Replaces every field of an existing product.
///
/// # Errors
/// Returns an error if the product does not exist or the new values fail the
/// same checks as [`create_product`].
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let existing: product::ActiveModel = get_product(db, product_id).await?.into();
    let updated = apply(db, existing, &input).await?.update(db).await?;
    info!(product_id, "Updated product");
    Ok(updated)
}

/// Deletes a product. Fails while order items still reference it.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    repository::delete::<Product, _>(db, product_id).await?;
    info!(product_id, "Deleted product");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;

    fn input(name: &str, category_id: i64, unit_price: f64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            category_id,
            description: Some(format!("{name} for happy pets")),
            image_path: None,
            unit_price,
        }
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let (db, category) = setup_with_category().await?;

        // Test empty name validation
        let result = create_product(&db, input("", category.id, 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Test whitespace-only name validation
        let result = create_product(&db, input("   ", category.id, 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Test negative price validation
        let result = create_product(&db, input("Bone", category.id, -10.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -10.0 }
        ));

        // Test NaN price validation
        let result = create_product(&db, input("Bone", category.id, f64::NAN)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        // Test infinity price validation
        let result = create_product(&db, input("Bone", category.id, f64::INFINITY)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(&db, input("Bone", 404, 3.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UnknownReference {
                entity: "category",
                id: 404
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_then_get_product() -> Result<()> {
        let (db, category) = setup_with_category().await?;

        let product = create_product(&db, input("  Chew Toy ", category.id, 15.50)).await?;
        assert_eq!(product.name, "Chew Toy");
        assert_eq!(product.unit_price, 15.50);
        assert_eq!(product.category_id, category.id);

        let found = get_product(&db, product.id).await?;
        assert_eq!(found, product);
        assert!(product_exists(&db, product.id).await?);

        let not_found = get_product(&db, 999).await;
        assert!(matches!(
            not_found.unwrap_err(),
            Error::NotFound {
                entity: "product",
                id: 999
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let product = create_product(&db, input("Original Name", category.id, 10.0)).await?;

        let mut changed = input("Updated Name", category.id, 15.0);
        changed.image_path = Some("/img/updated.png".to_string());
        let updated = update_product(&db, product.id, changed).await?;

        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.unit_price, 15.0);

        // Verify the update persisted
        let retrieved = get_product(&db, product.id).await?;
        assert_eq!(retrieved.image_path.as_deref(), Some("/img/updated.png"));

        let missing = update_product(&db, 999, input("Ghost", category.id, 1.0)).await;
        assert!(matches!(missing.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;

        delete_product(&db, product.id).await?;
        assert!(matches!(
            get_product(&db, product.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));

        let again = delete_product(&db, product.id).await;
        assert!(matches!(again.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_products_by_price() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        create_product(&db, input("Collar", category.id, 5.0)).await?;
        create_product(&db, input("Leash", category.id, 12.0)).await?;
        create_product(&db, input("Kennel", category.id, 80.0)).await?;

        let filter = ProductFilter {
            unit_price_equals: Some(12.0),
            ..Default::default()
        };
        let exact = search_products(&db, &filter, Pageable::new(0, 10)).await?;
        assert_eq!(exact.content.len(), 1);
        assert_eq!(exact.content[0].name, "Leash");

        let filter = ProductFilter {
            unit_price_greater_than: Some(5.0),
            unit_price_less_than: Some(80.0),
            ..Default::default()
        };
        let between = search_products(&db, &filter, Pageable::new(0, 10)).await?;
        assert_eq!(between.content.len(), 1);
        assert_eq!(between.content[0].name, "Leash");

        let filter = ProductFilter {
            unit_price_less_than: Some(50.0),
            ..Default::default()
        };
        let cheap = search_products(&db, &filter, Pageable::new(0, 10)).await?;
        assert_eq!(cheap.total_elements, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_products_combines_filters() -> Result<()> {
        let (db, dogs) = setup_with_category().await?;
        let cats = create_test_category(&db, "Cats").await?;
        create_product(&db, input("Dog Ball", dogs.id, 4.0)).await?;
        create_product(&db, input("Cat Ball", cats.id, 4.0)).await?;
        create_product(&db, input("Cat Tree", cats.id, 60.0)).await?;

        let filter = ProductFilter {
            name: Some("Ball".to_string()),
            category_id: Some(cats.id),
            ..Default::default()
        };
        let page = search_products(&db, &filter, Pageable::new(0, 10)).await?;
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Cat Ball");

        let all = search_products(&db, &ProductFilter::default(), Pageable::new(0, 2)).await?;
        assert_eq!(all.content.len(), 2);
        assert_eq!(all.total_elements, 3);
        assert_eq!(all.total_pages, 2);
        Ok(())
    }
}
