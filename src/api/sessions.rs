use super::{
    ApiResult, AppState, created,
    extract::{Json, Path, Query},
};
use crate::core::{
    pagination::{Page, PageParams},
    session::{self, SessionInput, SessionQuery},
};
use crate::entities::SessionModel;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(find_session))
        .route("/sessions/login", post(login))
        .route("/sessions/all", get(list_sessions))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/update", post(update_session))
        .route("/sessions/{id}/logout", delete(logout))
}

#[derive(Deserialize)]
struct LoginParams {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> ApiResult<Response> {
    let session = session::login(&state.db, &params.email, &params.password).await?;
    Ok(created(format!("/api/sessions/{}", session.id), session))
}

async fn find_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<SessionModel>> {
    let lookup = query.lookup()?;
    Ok(Json(session::find_session(&state.db, &lookup).await?))
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<SessionModel>>> {
    let pageable = state.pageable(&params)?;
    Ok(Json(session::list_sessions(&state.db, pageable).await?))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SessionModel>> {
    Ok(Json(session::get_session(&state.db, id).await?))
}

async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SessionInput>,
) -> ApiResult<Json<SessionModel>> {
    Ok(Json(session::update_session(&state.db, id, body).await?))
}

async fn logout(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    session::logout(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
