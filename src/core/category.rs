//! Category business logic - Manages the product category tree and start-up seeding.

use crate::{
    config::CategoryConfig,
    core::{
        pagination::{Page, Pageable, optional_param},
        repository,
        validation::{optional_text, required_text},
    },
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Fields accepted when creating or replacing a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Category name; required and unique.
    pub name: String,
    /// Parent category, if nested.
    #[serde(default)]
    pub parent_category_id: Option<i64>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Search filters. `name` and `description` match substrings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    /// Substring of the name.
    #[serde(default, deserialize_with = "optional_param")]
    pub name: Option<String>,
    /// Substring of the description.
    #[serde(default, deserialize_with = "optional_param")]
    pub description: Option<String>,
    /// Exact parent id.
    #[serde(default, deserialize_with = "optional_param")]
    pub parent_category_id: Option<i64>,
}

/// Creates a new category, optionally under an existing parent.
///
/// # Errors
/// Returns an error if the name is blank or the parent does not exist.
#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<category::Model> {
    let name = required_text("name", &input.name)?;
    if let Some(parent_id) = input.parent_category_id {
        repository::ensure_reference::<Category, _>(db, parent_id).await?;
    }

    let category = category::ActiveModel {
        name: Set(name),
        parent_category_id: Set(input.parent_category_id),
        description: Set(optional_text(input.description.as_deref())),
        ..Default::default()
    };
    let created = category.insert(db).await?;
    info!(category_id = created.id, "Created category");
    Ok(created)
}

/// Retrieves a category by id.
pub async fn get_category(db: &DatabaseConnection, category_id: i64) -> Result<category::Model> {
    repository::find_required::<Category, _>(db, category_id).await
}

/// Finds a category by its exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether a category with this id exists.
pub async fn category_exists(db: &DatabaseConnection, category_id: i64) -> Result<bool> {
    repository::exists::<Category, _>(db, category_id).await
}

/// Searches categories, ordered by id.
pub async fn search_categories(
    db: &DatabaseConnection,
    filter: &CategoryFilter,
    pageable: Pageable,
) -> Result<Page<category::Model>> {
    let mut condition = Condition::all();
    if let Some(name) = &filter.name {
        condition = condition.add(category::Column::Name.contains(name.as_str()));
    }
    if let Some(description) = &filter.description {
        condition = condition.add(category::Column::Description.contains(description.as_str()));
    }
    if let Some(parent_id) = filter.parent_category_id {
        condition = condition.add(category::Column::ParentCategoryId.eq(parent_id));
    }

    let select = Category::find()
        .filter(condition)
        .order_by_asc(category::Column::Id);
    repository::fetch_page(db, select, pageable).await
}

/// Replaces every field of an existing category.
///
/// # Errors
/// Returns an error if the category does not exist, the name is blank, or the
/// parent is missing or is the category itself.
#[instrument(skip(db))]
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    input: CategoryInput,
) -> Result<category::Model> {
    let name = required_text("name", &input.name)?;
    let mut category: category::ActiveModel = get_category(db, category_id).await?.into();

    if let Some(parent_id) = input.parent_category_id {
        repository::ensure_reference::<Category, _>(db, parent_id).await?;
        ensure_not_descendant(db, category_id, parent_id).await?;
    }

    category.name = Set(name);
    category.parent_category_id = Set(input.parent_category_id);
    category.description = Set(optional_text(input.description.as_deref()));

    let updated = category.update(db).await?;
    info!(category_id, "Updated category");
    Ok(updated)
}

/// Walks up from `parent_id` and fails if the chain reaches `category_id`.
async fn ensure_not_descendant(
    db: &DatabaseConnection,
    category_id: i64,
    parent_id: i64,
) -> Result<()> {
    let mut seen = HashSet::new();
    let mut current = Some(parent_id);
    while let Some(id) = current {
        if id == category_id {
            return Err(Error::validation(
                "a category cannot be its own parent or ancestor",
            ));
        }
        if !seen.insert(id) {
            break;
        }
        current = repository::find::<Category, _>(db, id)
            .await?
            .and_then(|c| c.parent_category_id);
    }
    Ok(())
}

/// Deletes a category. Fails while products or child categories reference it.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    repository::delete::<Category, _>(db, category_id).await?;
    info!(category_id, "Deleted category");
    Ok(())
}

/// Creates the configured categories whose names are not taken yet.
///
/// Returns how many categories were inserted.
#[instrument(skip(db, seeds), fields(count = seeds.len()))]
pub async fn seed_categories(db: &DatabaseConnection, seeds: &[CategoryConfig]) -> Result<usize> {
    let mut inserted = 0;
    for seed in seeds {
        let name = required_text("name", &seed.name)?;
        if get_category_by_name(db, &name).await?.is_some() {
            debug!("Category '{}' already exists, skipping", name);
            continue;
        }
        create_category(
            db,
            CategoryInput {
                name,
                parent_category_id: None,
                description: seed.description.clone(),
            },
        )
        .await?;
        inserted += 1;
    }
    info!(inserted, "Seeded categories");
    Ok(inserted)
}
