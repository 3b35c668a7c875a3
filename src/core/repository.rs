//! Generic paging repository over `SeaORM` entities.
//!
//! Every service goes through these helpers for id lookups, existence checks,
//! deletes and paged selects, so all entities share the same not-found and
//! paging behavior.

use crate::{
    core::pagination::{Page, Pageable},
    entities::Named,
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, ItemsAndPagesNumber, PaginatorTrait,
    PrimaryKeyTrait, Select,
};
use tracing::debug;

/// Finds a row by primary key.
pub async fn find<E, C>(db: &C, id: i64) -> Result<Option<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    E::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds a row by primary key, failing with [`Error::NotFound`] if it is missing.
pub async fn find_required<E, C>(db: &C, id: i64) -> Result<E::Model>
where
    E: EntityTrait + Named,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    find::<E, C>(db, id)
        .await?
        .ok_or(Error::NotFound { entity: E::NAME, id })
}

/// Returns true if a row with the given id exists.
pub async fn exists<E, C>(db: &C, id: i64) -> Result<bool>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    Ok(find::<E, C>(db, id).await?.is_some())
}

/// Fails with [`Error::UnknownReference`] if the referenced row does not exist.
pub async fn ensure_reference<E, C>(db: &C, id: i64) -> Result<()>
where
    E: EntityTrait + Named,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    if exists::<E, C>(db, id).await? {
        Ok(())
    } else {
        Err(Error::UnknownReference { entity: E::NAME, id })
    }
}

/// Deletes a row by primary key, failing with [`Error::NotFound`] if nothing was deleted.
pub async fn delete<E, C>(db: &C, id: i64) -> Result<()>
where
    E: EntityTrait + Named,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    let result = E::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: E::NAME, id });
    }
    debug!(entity = E::NAME, id, "Deleted row");
    Ok(())
}

/// Runs `select` one page at a time and reports the totals alongside the page.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    pageable: Pageable,
) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let paginator = select.paginate(db, pageable.size);
    let ItemsAndPagesNumber {
        number_of_items,
        number_of_pages,
    } = paginator.num_items_and_pages().await?;
    let content = paginator.fetch_page(pageable.page).await?;

    Ok(Page {
        content,
        page: pageable.page,
        size: pageable.size,
        total_elements: number_of_items,
        total_pages: number_of_pages,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Category, category};
    use crate::test_utils::*;
    use sea_orm::QueryOrder;

    #[tokio::test]
    async fn test_find_and_exists() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_category(&db, "Dogs").await?;

        assert!(exists::<Category, _>(&db, created.id).await?);
        assert!(!exists::<Category, _>(&db, created.id + 1).await?);
        assert_eq!(find_required::<Category, _>(&db, created.id).await?, created);

        let missing = find_required::<Category, _>(&db, 999).await;
        assert!(matches!(
            missing,
            Err(Error::NotFound {
                entity: "category",
                id: 999
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_reference() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_category(&db, "Cats").await?;

        ensure_reference::<Category, _>(&db, created.id).await?;
        let result = ensure_reference::<Category, _>(&db, 42).await;
        assert!(matches!(
            result,
            Err(Error::UnknownReference {
                entity: "category",
                id: 42
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_row() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_category(&db, "Birds").await?;

        delete::<Category, _>(&db, created.id).await?;
        assert!(find::<Category, _>(&db, created.id).await?.is_none());

        let again = delete::<Category, _>(&db, created.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_page_totals() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["A", "B", "C", "D", "E"] {
            create_test_category(&db, name).await?;
        }

        let select = Category::find().order_by_asc(category::Column::Id);
        let page = fetch_page(&db, select.clone(), Pageable::new(0, 2)).await?;
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content[0].name, "A");

        let last = fetch_page(&db, select.clone(), Pageable::new(2, 2)).await?;
        assert_eq!(last.content.len(), 1);
        assert_eq!(last.content[0].name, "E");

        let beyond = fetch_page(&db, select, Pageable::new(7, 2)).await?;
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 5);
        Ok(())
    }
}
