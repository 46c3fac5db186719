//! Handler for `GET /dashboards/:id`.
//!
//! Looks the registration up and hands it to the aggregator. An unknown id is
//! a 404; any upstream failure is a 502 whose message names the stage.

use axum::{
  Json,
  extract::{Path, State},
};
use dashboard_core::dashboard::PopulatedDashboard;
use uuid::Uuid;

use crate::{AppState, Backend, error::ApiError, registrations::stored};

/// `GET /dashboards/:id`
pub async fn get_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PopulatedDashboard>, ApiError> {
  let registration = stored(&state, id).await?;
  let dashboard = state.aggregator.build(&registration).await.map_err(|e| {
    tracing::warn!(%id, error = %e, "dashboard build failed");
    ApiError::from(e)
  })?;
  Ok(Json(dashboard))
}
