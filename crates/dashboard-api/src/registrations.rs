//! Handlers for `/registrations` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/registrations` | Every stored registration |
//! | `POST`   | `/registrations` | Body: [`NewRegistration`]; ISO code validated; 201 `{id, lastChange}` |
//! | `GET`    | `/registrations/:id` | 404 if not found |
//! | `PUT`    | `/registrations/:id` | Body: [`RegistrationPatch`]; returns the updated registration |
//! | `DELETE` | `/registrations/:id` | 204, or 404 if not found |
//!
//! Successful writes emit `REGISTER`, `CHANGE` and `DELETE` respectively.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use dashboard_core::{
  event::Event,
  registration::{NewRegistration, Registration, RegistrationPatch},
  store::RegistrationStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, Backend, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /registrations`
pub async fn list<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<Vec<Registration>>, ApiError> {
  let registrations = state
    .store
    .list_registrations()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(registrations))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /registrations/:id`
pub async fn get_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Registration>, ApiError> {
  Ok(Json(stored(&state, id).await?))
}

pub(crate) async fn stored<B: Backend>(
  state: &AppState<B>,
  id: Uuid,
) -> Result<Registration, ApiError> {
  state
    .store
    .get_registration(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("registration {id} not found")))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
  pub id:          Uuid,
  pub last_change: DateTime<Utc>,
}

/// `POST /registrations`
pub async fn create<B: Backend>(
  State(state): State<AppState<B>>,
  Json(body): Json<NewRegistration>,
) -> Result<impl IntoResponse, ApiError> {
  let country = required("country", &body.country)?;
  let iso_code = required("isoCode", &body.iso_code)?.to_ascii_uppercase();

  state.validator.validate(&country, &iso_code).await?;

  let registration = state
    .store
    .create_registration(NewRegistration {
      country,
      iso_code,
      features: body.features.normalized(),
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id = %registration.id, country = %registration.country, "registration created");
  state.events.trigger(Event::Register, &registration.iso_code);

  Ok((
    StatusCode::CREATED,
    Json(Created {
      id:          registration.id,
      last_change: registration.last_change,
    }),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /registrations/:id`
///
/// Absent fields keep their stored value. A new `country` must come with the
/// matching `isoCode`; an `isoCode` on its own is checked against the stored
/// country.
pub async fn update<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<RegistrationPatch>,
) -> Result<Json<Registration>, ApiError> {
  let current = stored(&state, id).await?;
  let mut next = NewRegistration::from(current);

  let country = patch
    .country
    .as_deref()
    .map(|c| required("country", c))
    .transpose()?;
  let iso_code = patch
    .iso_code
    .as_deref()
    .map(|c| required("isoCode", c).map(|c| c.to_ascii_uppercase()))
    .transpose()?;

  match (country, iso_code) {
    (Some(country), Some(iso_code)) => {
      state.validator.validate(&country, &iso_code).await?;
      next.country = country;
      next.iso_code = iso_code;
    }
    (Some(country), None) => {
      if !country.eq_ignore_ascii_case(&next.country) {
        return Err(ApiError::BadRequest(
          "isoCode is required when changing country".into(),
        ));
      }
    }
    (None, Some(iso_code)) => {
      state.validator.validate(&next.country, &iso_code).await?;
      next.iso_code = iso_code;
    }
    (None, None) => {}
  }

  if let Some(features) = patch.features {
    features.apply(&mut next.features);
  }

  let updated = state
    .store
    .update_registration(id, next)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("registration {id} not found")))?;

  tracing::info!(%id, "registration updated");
  state.events.trigger(Event::Change, &updated.iso_code);
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /registrations/:id`
pub async fn remove<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let current = stored(&state, id).await?;

  let deleted = state
    .store
    .delete_registration(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("registration {id} not found")));
  }

  tracing::info!(%id, "registration deleted");
  state.events.trigger(Event::Delete, &current.iso_code);
  Ok(StatusCode::NO_CONTENT)
}

/// Trimmed `value`, or a 400 naming `field` when it is blank.
fn required(field: &str, value: &str) -> Result<String, ApiError> {
  let value = value.trim();
  if value.is_empty() {
    return Err(ApiError::BadRequest(format!("{field} is required")));
  }
  Ok(value.to_owned())
}
