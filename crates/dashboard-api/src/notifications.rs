//! Handlers for `/notifications` endpoints (webhook subscribers).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/notifications` | Every subscriber |
//! | `POST`   | `/notifications` | Body: `{"url":..,"country":..,"event":"DELETE"}`; 201 `{id}` |
//! | `GET`    | `/notifications/:id` | 404 if not found |
//! | `DELETE` | `/notifications/:id` | 204, or 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dashboard_core::{
  store::SubscriberStore,
  subscriber::{NewSubscriber, Subscriber},
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, Backend, error::ApiError};

/// `GET /notifications`
pub async fn list<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
  let subscribers = state
    .store
    .list_subscribers()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(subscribers))
}

/// `GET /notifications/:id`
pub async fn get_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Subscriber>, ApiError> {
  let subscriber = state
    .store
    .get_subscriber(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("webhook {id} not found")))?;
  Ok(Json(subscriber))
}

/// `POST /notifications`
pub async fn create<B: Backend>(
  State(state): State<AppState<B>>,
  Json(body): Json<NewSubscriber>,
) -> Result<impl IntoResponse, ApiError> {
  let input = body.normalized();
  if input.url.is_empty() {
    return Err(ApiError::BadRequest("url is required".into()));
  }

  let subscriber = state
    .store
    .create_subscriber(input)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id = %subscriber.id, event = %subscriber.event, "webhook registered");
  Ok((StatusCode::CREATED, Json(json!({ "id": subscriber.id }))))
}

/// `DELETE /notifications/:id`
pub async fn remove<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let deleted = state
    .store
    .delete_subscriber(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("webhook {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
