//! REST interface - one axum router per resource, mounted under `/api`.
//!
//! Handlers parse path, query and JSON input, call into [`crate::core`], and
//! turn the outcome into a status code. Failures become [`ApiError`] bodies of
//! the form `{"error": {"code": 404, "message": "..."}}`.

mod addresses;
mod categories;
mod extract;
mod order_items;
mod orders;
mod products;
mod sessions;
mod suppliers;
mod users;

use crate::{
    config::PaginationConfig,
    core::pagination::{PageParams, Pageable},
    errors::Error,
};
use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::{DatabaseConnection, SqlErr};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Shared connection pool.
    pub db: DatabaseConnection,
    /// Page size defaults and limits for searches.
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Bundles the connection and page limits.
    #[must_use]
    pub const fn new(db: DatabaseConnection, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }

    /// Applies the configured page limits to the `page`/`size` parameters.
    pub fn pageable(&self, params: &PageParams) -> Result<Pageable, ApiError> {
        Pageable::from_params(params, self.pagination).map_err(ApiError::from)
    }
}

/// Builds the full HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(addresses::routes())
        .merge(categories::routes())
        .merge(order_items::routes())
        .merge(orders::routes())
        .merge(products::routes())
        .merge(sessions::routes())
        .merge(suppliers::routes())
        .merge(users::routes())
}

async fn health() -> &'static str {
    "OK"
}

/// Standard API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// HTTP status code.
    pub code: u16,
    /// Human-readable reason.
    pub message: String,
}

/// Handler result; the error side renders as an [`ApiError`] body.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (status, body).into_response()
    }
}

fn status_of(err: &Error) -> StatusCode {
    match err {
        Error::NotFound { .. } | Error::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        Error::Validation { .. } | Error::InvalidAmount { .. } | Error::UnknownReference { .. } => {
            StatusCode::BAD_REQUEST
        }
        Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
        Error::Database(db_err) => match db_err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_)) => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
        Error::Config { .. } | Error::PasswordHash { .. } | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = status_of(&err);
        let message = if status.is_server_error() {
            error!(error = %err, "Request failed");
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self {
            code: status.as_u16(),
            message,
        }
    }
}

/// A `201 Created` response pointing at the new resource.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}
