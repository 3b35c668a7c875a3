use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    address::{self, AddressFilter, AddressInput},
    pagination::{Page, PageParams},
};
use crate::entities::AddressModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(search_addresses))
        .route("/addresses/create", post(create_address))
        .route("/addresses/{id}", get(get_address))
        .route("/addresses/{id}/update", post(update_address))
        .route("/addresses/{id}/delete", delete(delete_address))
}

async fn create_address(
    State(state): State<AppState>,
    Json(body): Json<AddressInput>,
) -> ApiResult<Response> {
    let address = address::create_address(&state.db, body).await?;
    Ok(created(format!("/api/addresses/{}", address.id), address))
}

async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AddressModel>> {
    Ok(Json(address::get_address(&state.db, id).await?))
}

async fn search_addresses(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<AddressFilter>,
) -> ApiResult<Json<Page<AddressModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(address::search_addresses(&state.db, &filter, pageable).await?))
}

async fn update_address(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AddressInput>,
) -> ApiResult<Json<AddressModel>> {
    Ok(Json(address::update_address(&state.db, id, body).await?))
}

async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    address::delete_address(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
