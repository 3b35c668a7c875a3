use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    pagination::{Page, PageParams},
    product::{self, ProductFilter, ProductInput},
};
use crate::entities::ProductModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(search_products))
        .route("/products/create", post(create_product))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/update", post(update_product))
        .route("/products/{id}/delete", delete(delete_product))
}

async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductInput>,
) -> ApiResult<Response> {
    let product = product::create_product(&state.db, body).await?;
    Ok(created(format!("/api/products/{}", product.id), product))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductModel>> {
    Ok(Json(product::get_product(&state.db, id).await?))
}

async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Page<ProductModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(product::search_products(&state.db, &filter, pageable).await?))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ProductInput>,
) -> ApiResult<Json<ProductModel>> {
    Ok(Json(product::update_product(&state.db, id, body).await?))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    product::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
