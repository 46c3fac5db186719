//! Handler for `GET /status`.

use axum::{Json, extract::State};
use dashboard_core::{
  store::SubscriberStore,
  upstream::{CountryProvider, CurrencyProvider, ProviderError, WeatherProvider},
};
use serde::{Serialize, Serializer};

use crate::{API_VERSION, AppState, Backend, error::ApiError};

/// Outcome of one upstream probe: the HTTP status it answered with, or
/// `"unreachable"` when no response came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
  Status(u16),
  Unreachable,
}

impl Reachability {
  fn from_probe(service: &str, result: Result<u16, ProviderError>) -> Self {
    match result {
      Ok(code) => Reachability::Status(code),
      Err(e) => {
        tracing::debug!(%service, error = %e, "upstream probe failed");
        Reachability::Unreachable
      }
    }
  }
}

impl Serialize for Reachability {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Reachability::Status(code) => serializer.serialize_u16(*code),
      Reachability::Unreachable => serializer.serialize_str("unreachable"),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
  pub countries_api: Reachability,
  pub weather_api:   Reachability,
  pub currency_api:  Reachability,
  /// Number of registered webhooks.
  pub webhooks:      usize,
  pub version:       &'static str,
  /// Seconds since the service started.
  pub uptime:        u64,
}

/// `GET /status`. Probes the three providers concurrently.
pub async fn handler<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<StatusReport>, ApiError> {
  let (countries, weather, currency) = tokio::join!(
    state.countries.probe(),
    state.weather.probe(),
    state.currency.probe(),
  );

  let webhooks = state
    .store
    .count_subscribers()
    .await
    .map_err(ApiError::store)?;

  Ok(Json(StatusReport {
    countries_api: Reachability::from_probe("countries", countries),
    weather_api: Reachability::from_probe("weather", weather),
    currency_api: Reachability::from_probe("currency", currency),
    webhooks,
    version: API_VERSION,
    uptime: state.started_at.elapsed().as_secs(),
  }))
}
