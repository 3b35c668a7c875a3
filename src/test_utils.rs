//! Shared test utilities for the pet shop.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and driving the HTTP router.

#![allow(clippy::unwrap_used)]

use crate::{
    api::{self, AppState},
    config::PaginationConfig,
    core::{
        address::{self, AddressInput},
        category::{self, CategoryInput},
        product::{self, ProductInput},
        user::{self, UserInput},
    },
    entities,
    errors::Result,
};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

/// Password given to every test user. Safe to put in a query string unescaped.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a top-level test category with no description.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(
        db,
        CategoryInput {
            name: name.to_string(),
            parent_category_id: None,
            description: None,
        },
    )
    .await
}

/// Creates a test address in the given country.
///
/// # Defaults
/// * `post_office_box`: "PO 100"
/// * `city`: "Capital"
pub async fn create_test_address(
    db: &DatabaseConnection,
    country: &str,
) -> Result<entities::address::Model> {
    address::create_address(
        db,
        AddressInput {
            post_office_box: "PO 100".to_string(),
            street: None,
            city: Some("Capital".to_string()),
            state: None,
            country: country.to_string(),
        },
    )
    .await
}

/// Creates a regular (non-admin) test user whose password is [`TEST_PASSWORD`].
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        UserInput {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: TEST_PASSWORD.to_string(),
            admin: false,
        },
    )
    .await
}

/// Creates a test product with a custom price.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
    unit_price: f64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductInput {
            name: name.to_string(),
            category_id,
            description: None,
            image_path: None,
            unit_price,
        },
    )
    .await
}

/// Sets up a test environment with a single "Dogs" category.
pub async fn setup_with_category() -> Result<(DatabaseConnection, entities::category::Model)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Dogs").await?;
    Ok((db, category))
}

/// Sets up a complete test environment with category and product.
/// Returns (db, category, product); the product costs 12.5.
pub async fn setup_with_product() -> Result<(
    DatabaseConnection,
    entities::category::Model,
    entities::product::Model,
)> {
    let (db, category) = setup_with_category().await?;
    let product = create_test_product(&db, "Test Product", category.id, 12.5).await?;
    Ok((db, category, product))
}

/// Builds the HTTP router over `db` with default page limits.
pub fn test_app(db: DatabaseConnection) -> Router {
    api::router(AppState::new(db, PaginationConfig::default()))
}

/// Builds the HTTP router over a fresh, empty database.
pub async fn setup_test_app() -> Result<Router> {
    Ok(test_app(setup_test_db().await?))
}

/// Sends one request through the router and returns the status, headers and
/// raw body text.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Like [`send`], but parses the body as JSON (`null` when empty or not JSON).
pub async fn api_with_headers(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let (status, headers, text) = send(router, method, uri, body).await;
    let json = if text.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(serde_json::Value::Null)
    };
    (status, headers, json)
}

/// Sends a JSON request and returns the status and JSON body.
pub async fn api(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, _, json) = api_with_headers(router, method, uri, body).await;
    (status, json)
}
