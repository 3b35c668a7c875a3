use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    pagination::{Page, PageParams},
    supplier::{self, SupplierFilter, SupplierInput},
};
use crate::entities::SupplierModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(search_suppliers))
        .route("/suppliers/create", post(create_supplier))
        .route("/suppliers/{id}", get(get_supplier))
        .route("/suppliers/{id}/update", post(update_supplier))
        .route("/suppliers/{id}/delete", delete(delete_supplier))
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(body): Json<SupplierInput>,
) -> ApiResult<Response> {
    let supplier = supplier::create_supplier(&state.db, body).await?;
    Ok(created(format!("/api/suppliers/{}", supplier.id), supplier))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SupplierModel>> {
    Ok(Json(supplier::get_supplier(&state.db, id).await?))
}

async fn search_suppliers(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<SupplierFilter>,
) -> ApiResult<Json<Page<SupplierModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(supplier::search_suppliers(&state.db, &filter, pageable).await?))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SupplierInput>,
) -> ApiResult<Json<SupplierModel>> {
    Ok(Json(supplier::update_supplier(&state.db, id, body).await?))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    supplier::delete_supplier(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::errors::Result;
    use crate::test_utils::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_duplicate_supplier_email_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let address = create_test_address(&db, "Cameroon").await?;
        let app = test_app(db);
        let body = json!({
            "name": "Farm Fresh",
            "email": "sales@farmfresh.cm",
            "phoneNumber": "+237 600 000 000",
            "addressId": address.id,
        });

        let (status, created) =
            api(&app, Method::POST, "/api/suppliers/create", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["addressId"], address.id);

        let (status, error) = api(&app, Method::POST, "/api/suppliers/create", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error["error"]["code"], 409);

        let (status, page) = api(&app, Method::GET, "/api/suppliers?phoneNumber=600", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalElements"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_supplier_unknown_address() -> Result<()> {
        let app = setup_test_app().await?;

        let (status, body) = api(
            &app,
            Method::POST,
            "/api/suppliers/create",
            Some(json!({"name": "Nobody", "email": "x@y.z", "addressId": 12})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Referenced address 12 does not exist");
        Ok(())
    }
}
