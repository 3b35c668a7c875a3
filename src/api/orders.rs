use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    order::{self, OrderDetails, OrderFilter, OrderInput, OrderUpdate},
    pagination::{Page, PageParams},
};
use crate::entities::OrderModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(search_orders))
        .route("/orders/create", post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/update", post(update_order))
        .route("/orders/{id}/delete", delete(delete_order))
}

async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<OrderInput>,
) -> ApiResult<Response> {
    let details = order::create_order(&state.db, body).await?;
    Ok(created(format!("/api/orders/{}", details.order.id), details))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<OrderDetails>> {
    Ok(Json(order::get_order(&state.db, id).await?))
}

async fn search_orders(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Json<Page<OrderModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(order::search_orders(&state.db, &filter, pageable).await?))
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<OrderUpdate>,
) -> ApiResult<Json<OrderModel>> {
    Ok(Json(order::update_order(&state.db, id, body).await?))
}

async fn delete_order(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    order::delete_order(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::errors::Result;
    use crate::test_utils::*;
    use axum::http::{Method, StatusCode, header};
    use serde_json::json;

    #[tokio::test]
    async fn test_place_and_fetch_order_over_http() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;
        let buyer = create_test_user(&db, "buyer@example.com").await?;
        let address = create_test_address(&db, "Cameroon").await?;
        let app = test_app(db);

        let (status, headers, placed) = api_with_headers(
            &app,
            Method::POST,
            "/api/orders/create",
            Some(json!({
                "buyerId": buyer.id,
                "shippingFee": 2.5,
                "shippingAddressId": address.id,
                "items": [{"productId": product.id, "quantity": 4}],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = placed["id"].as_i64().unwrap();
        assert_eq!(headers[header::LOCATION], format!("/api/orders/{id}").as_str());
        assert_eq!(placed["cost"], product.unit_price * 4.0);
        assert_eq!(placed["deliveredStatus"], false);
        assert_eq!(placed["items"][0]["orderId"], id);

        let (status, fetched) = api(&app, Method::GET, &format!("/api/orders/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, placed);

        let (status, page) = api(
            &app,
            Method::GET,
            &format!("/api/orders?buyerId={}&delivered=false", buyer.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalElements"], 1);
        assert!(page["content"][0].get("items").is_none());

        let (status, _) = api(&app, Method::GET, "/api/orders?placedAfter=yesterday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = api(&app, Method::DELETE, &format!("/api/orders/{id}/delete"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, page) = api(&app, Method::GET, "/api/orderItems", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalElements"], 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_with_unknown_buyer_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let address = create_test_address(&db, "Cameroon").await?;
        let app = test_app(db);

        let (status, body) = api(
            &app,
            Method::POST,
            "/api/orders/create",
            Some(json!({"buyerId": 8, "shippingAddressId": address.id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Referenced user 8 does not exist");
        Ok(())
    }
}
