use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    pagination::{Page, PageParams},
    user::{self, UserFilter, UserInput, UserUpdate},
};
use crate::entities::UserModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(search_users))
        .route("/users/create", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/update", post(update_user))
        .route("/users/{id}/delete", delete(delete_user))
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<UserInput>,
) -> ApiResult<Response> {
    let user = user::create_user(&state.db, body).await?;
    Ok(created(format!("/api/users/{}", user.id), user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserModel>> {
    Ok(Json(user::get_user(&state.db, id).await?))
}

async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Page<UserModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(user::search_users(&state.db, &filter, pageable).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UserUpdate>,
) -> ApiResult<Json<UserModel>> {
    Ok(Json(user::update_user(&state.db, id, body).await?))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    user::delete_user(&state.db, id).await?;
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
    async fn test_user_json_never_contains_password() -> Result<()> {
        let app = setup_test_app().await?;

        let (status, user) = api(
            &app,
            Method::POST,
            "/api/users/create",
            Some(json!({
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "password": "analytical engine",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["isAdmin"], false);
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user["createdAt"].as_str().unwrap().contains('T'));

        let (status, page) = api(&app, Method::GET, "/api/users?name=love&admin=false", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalElements"], 1);
        assert!(page["content"][0].get("passwordHash").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_user_email_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "ada@example.com").await?;
        let app = test_app(db);

        let (status, _) = api(
            &app,
            Method::POST,
            "/api/users/create",
            Some(json!({
                "email": "Ada@Example.com",
                "firstName": "Ada",
                "lastName": "Again",
                "password": "analytical engine",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_over_http() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ada@example.com").await?;
        let app = test_app(db);

        let (status, body) = api(
            &app,
            Method::POST,
            &format!("/api/users/{}/update", user.id),
            Some(json!({
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "King",
                "admin": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lastName"], "King");
        assert_eq!(body["isAdmin"], true);

        let (status, _) = api(&app, Method::DELETE, &format!("/api/users/{}/delete", user.id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        Ok(())
    }

    #[tokio::test]
    async fn test_posting_back_fetched_admin_keeps_flag() -> Result<()> {
        let app = setup_test_app().await?;
        let (status, created) = api(
            &app,
            Method::POST,
            "/api/users/create",
            Some(json!({
                "email": "grace@example.com",
                "firstName": "Grace",
                "lastName": "Hopper",
                "password": "compiler pioneer",
                "isAdmin": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["isAdmin"], true);
        let id = created["id"].as_i64().unwrap();

        let (_, mut fetched) = api(&app, Method::GET, &format!("/api/users/{id}"), None).await;
        fetched["lastName"] = json!("Murray Hopper");
        let (status, updated) =
            api(&app, Method::POST, &format!("/api/users/{id}/update"), Some(fetched)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["lastName"], "Murray Hopper");

        let (_, refetched) = api(&app, Method::GET, &format!("/api/users/{id}"), None).await;
        assert_eq!(refetched["isAdmin"], true);
        assert_eq!(refetched["lastName"], "Murray Hopper");
        Ok(())
    }
}
