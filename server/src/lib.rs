//! REST API for the todo service.
//!
//! # Overview
//! Four routes over a file-backed [`store::TodoStore`]:
//! - `GET /api/todos` — full collection, insertion order
//! - `POST /api/todos` — append, `400` when content is empty
//! - `PUT /api/todos/{id}` — replace content, `404` for unknown ids
//! - `DELETE /api/todos/{id}` — remove, `404` for unknown ids
//!
//! Error bodies follow the web client's contract: client errors carry
//! `{"message": …}`, store failures carry `{"error": …}` and a `500`.
//! A malformed id or body is rejected by the extractors before a handler
//! runs (`400` respectively `422`).
//!
//! CORS is restricted to the single configured browser origin, with
//! credentials allowed. Request/response logging comes from
//! `tower_http::trace` under the `tracing` stack.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

pub mod config;
pub mod store;

use store::{StoreError, TodoRecord, TodoStore};

/// Wire representation of a todo. List responses omit `createdAt`; create
/// and update responses include it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTodo {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ApiTodo {
    fn without_timestamp(record: &TodoRecord) -> Self {
        Self {
            id: record.id,
            content: record.content.clone(),
            is_completed: record.is_completed,
            created_at: None,
        }
    }

    fn with_timestamp(record: &TodoRecord) -> Self {
        Self {
            created_at: Some(record.created_at),
            ..Self::without_timestamp(record)
        }
    }
}

#[derive(Deserialize)]
pub struct CreateTodoBody {
    /// Missing content behaves like empty content: both are rejected with
    /// the same `400`.
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateTodoBody {
    pub content: String,
}

/// Handler failure, rendered with the contract's status and body.
pub enum ApiError {
    ContentRequired,
    TodoNotFound,
    Store(&'static str, StoreError),
}

#[derive(Serialize)]
struct ClientError {
    message: &'static str,
}

#[derive(Serialize)]
struct ServerError {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ContentRequired => (
                StatusCode::BAD_REQUEST,
                Json(ClientError {
                    message: "Content is required",
                }),
            )
                .into_response(),
            ApiError::TodoNotFound => (
                StatusCode::NOT_FOUND,
                Json(ClientError {
                    message: "Todo is not found",
                }),
            )
                .into_response(),
            ApiError::Store(context, e) => {
                tracing::error!("{context}: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ServerError { error: context }),
                )
                    .into_response()
            }
        }
    }
}

pub type SharedStore = Arc<TodoStore>;

pub fn app(store: SharedStore, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(store)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(
    listener: TcpListener,
    store: SharedStore,
    allowed_origin: HeaderValue,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store, allowed_origin)).await
}

async fn list_todos(State(store): State<SharedStore>) -> Json<Vec<ApiTodo>> {
    let todos = store.list().await;
    Json(todos.iter().map(ApiTodo::without_timestamp).collect())
}

async fn create_todo(
    State(store): State<SharedStore>,
    Json(input): Json<CreateTodoBody>,
) -> Result<(StatusCode, Json<ApiTodo>), ApiError> {
    if input.content.is_empty() {
        return Err(ApiError::ContentRequired);
    }
    let record = store
        .insert(input.content)
        .await
        .map_err(|e| ApiError::Store("Failed to create todo", e))?;
    Ok((StatusCode::CREATED, Json(ApiTodo::with_timestamp(&record))))
}

async fn update_todo(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodoBody>,
) -> Result<Json<ApiTodo>, ApiError> {
    let updated = store
        .update_content(id, input.content)
        .await
        .map_err(|e| ApiError::Store("Failed to update todos", e))?;
    match updated {
        Some(record) => Ok(Json(ApiTodo::with_timestamp(&record))),
        None => Err(ApiError::TodoNotFound),
    }
}

async fn delete_todo(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = store
        .remove(id)
        .await
        .map_err(|e| ApiError::Store("Failed to delete todos", e))?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::TodoNotFound)
    }
}
