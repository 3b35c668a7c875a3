use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    category::{self, CategoryFilter, CategoryInput},
    pagination::{Page, PageParams},
};
use crate::entities::CategoryModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(search_categories))
        .route("/categories/create", post(create_category))
        .route("/categories/{id}", get(get_category))
        .route("/categories/{id}/update", post(update_category))
        .route("/categories/{id}/delete", delete(delete_category))
}

async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryInput>,
) -> ApiResult<Response> {
    let category = category::create_category(&state.db, body).await?;
    Ok(created(format!("/api/categories/{}", category.id), category))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CategoryModel>> {
    Ok(Json(category::get_category(&state.db, id).await?))
}

async fn search_categories(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<CategoryFilter>,
) -> ApiResult<Json<Page<CategoryModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(category::search_categories(&state.db, &filter, pageable).await?))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryInput>,
) -> ApiResult<Json<CategoryModel>> {
    Ok(Json(category::update_category(&state.db, id, body).await?))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    category::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
