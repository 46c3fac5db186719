//! Contracts for the three upstream data providers and the webhook sender.
//!
//! Implementations live in `dashboard-upstream` (reqwest) and in test code.
//! The payload types mirror what the providers return on the wire; the
//! aggregator normalises them into [`crate::dashboard::CountryInfo`] and
//! friends.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Notification;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failed call to an upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
  /// The provider answered 404.
  #[error("not found upstream")]
  NotFound,

  /// Any other non-success status.
  #[error("upstream responded with status {0}")]
  Status(u16),

  /// The request never produced a response (DNS, connect, timeout).
  #[error("upstream request failed: {0}")]
  Transport(String),

  /// The response body did not have the expected shape.
  #[error("malformed upstream payload: {0}")]
  Malformed(String),
}

/// A failed webhook delivery. Logged by the dispatcher, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
  #[error("subscriber responded with status {0}")]
  Status(u16),

  #[error("delivery timed out")]
  Timeout,

  #[error("delivery failed: {0}")]
  Transport(String),
}

// ─── Country provider ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
  pub common: String,
}

/// One element of the country provider's `/name/{country}` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
  #[serde(default)]
  pub name:       CountryName,
  /// ISO 3166-1 alpha-2 code.
  #[serde(default)]
  pub cca2:       Option<String>,
  #[serde(default)]
  pub capital:    Vec<String>,
  /// `[latitude, longitude]`.
  #[serde(default)]
  pub latlng:     Vec<f64>,
  #[serde(default)]
  pub population: u64,
  /// Square kilometres.
  #[serde(default)]
  pub area:       f64,
  /// Keyed by ISO 4217 code; the values are not used.
  #[serde(default)]
  pub currencies: BTreeMap<String, serde_json::Value>,
}

/// Looks countries up by their common name.
pub trait CountryProvider: Send + Sync + 'static {
  /// `GET /name/{name}`. A 404 must surface as [`ProviderError::NotFound`].
  fn lookup<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<CountryRecord>, ProviderError>> + Send + 'a;

  /// Reachability check; returns the HTTP status of a known-good request.
  fn probe(&self) -> impl Future<Output = Result<u16, ProviderError>> + Send + '_;
}

// ─── Weather provider ────────────────────────────────────────────────────────

/// Hourly forecast series; both vectors cover the same hours. The provider
/// reports `null` for hours it has no value for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
  #[serde(rename = "temperature_2m", default)]
  pub temperature:   Vec<Option<f64>>,
  #[serde(default)]
  pub precipitation: Vec<Option<f64>>,
}

pub trait WeatherProvider: Send + Sync + 'static {
  /// Hourly temperature and precipitation for a coordinate pair.
  fn hourly(
    &self,
    latitude: f64,
    longitude: f64,
  ) -> impl Future<Output = Result<HourlySeries, ProviderError>> + Send + '_;

  fn probe(&self) -> impl Future<Output = Result<u16, ProviderError>> + Send + '_;
}

// ─── Currency provider ───────────────────────────────────────────────────────

/// Exchange rates relative to `base`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
  #[serde(default)]
  pub base:  String,
  pub rates: BTreeMap<String, f64>,
}

pub trait CurrencyProvider: Send + Sync + 'static {
  /// `GET /{base}`: every rate the provider knows for `base`.
  fn rates<'a>(
    &'a self,
    base: &'a str,
  ) -> impl Future<Output = Result<RateTable, ProviderError>> + Send + 'a;

  fn probe(&self) -> impl Future<Output = Result<u16, ProviderError>> + Send + '_;
}

// ─── Webhook sender ──────────────────────────────────────────────────────────

/// Delivers one notification to one URL.
///
/// Implementations own the per-delivery timeout. A non-2xx answer is an
/// error; the returned status is the successful one.
pub trait WebhookSender: Send + Sync + 'static {
  fn deliver<'a>(
    &'a self,
    url: &'a str,
    notification: &'a Notification,
  ) -> impl Future<Output = Result<u16, DeliveryError>> + Send + 'a;
}
