use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    order_item::{self, OrderItemFilter, OrderItemInput},
    pagination::{Page, PageParams},
};
use crate::entities::OrderItemModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orderItems", get(search_order_items))
        .route("/orderItems/create", post(create_order_item))
        .route("/orderItems/{id}", get(get_order_item))
        .route("/orderItems/{id}/update", post(update_order_item))
        .route("/orderItems/{id}/delete", delete(delete_order_item))
}

async fn create_order_item(
    State(state): State<AppState>,
    Json(body): Json<OrderItemInput>,
) -> ApiResult<Response> {
    let item = order_item::create_order_item(&state.db, body).await?;
    Ok(created(format!("/api/orderItems/{}", item.id), item))
}

async fn get_order_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<OrderItemModel>> {
    Ok(Json(order_item::get_order_item(&state.db, id).await?))
}

async fn search_order_items(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<OrderItemFilter>,
) -> ApiResult<Json<Page<OrderItemModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(order_item::search_order_items(&state.db, &filter, pageable).await?))
}

async fn update_order_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<OrderItemInput>,
) -> ApiResult<Json<OrderItemModel>> {
    Ok(Json(order_item::update_order_item(&state.db, id, body).await?))
}

async fn delete_order_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    order_item::delete_order_item(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
