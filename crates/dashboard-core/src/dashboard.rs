//! The populated dashboard, the computed read model for a registration.
//!
//! Never stored, always derived from the upstream providers on read.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::upstream::{CountryRecord, ProviderError};

// ─── CountryInfo ─────────────────────────────────────────────────────────────

/// The aggregator's normalised view of one country-provider record. Lives for
/// the duration of a single aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryInfo {
  pub name:          String,
  pub iso_code:      String,
  /// First listed capital; empty when the provider lists none.
  pub capital:       String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub population:    u64,
  pub area:          f64,
  /// First currency code in the provider's map, if it lists any.
  pub base_currency: Option<String>,
}

impl TryFrom<CountryRecord> for CountryInfo {
  type Error = ProviderError;

  fn try_from(record: CountryRecord) -> Result<Self, Self::Error> {
    let iso_code = record
      .cca2
      .filter(|code| !code.trim().is_empty())
      .ok_or_else(|| ProviderError::Malformed("record has no cca2 code".into()))?;

    let (latitude, longitude) = match record.latlng.as_slice() {
      [lat, lng, ..] => (*lat, *lng),
      _ => (0.0, 0.0),
    };

    Ok(CountryInfo {
      name: record.name.common,
      iso_code,
      capital: record.capital.into_iter().next().unwrap_or_default(),
      latitude,
      longitude,
      population: record.population,
      area: record.area,
      base_currency: record.currencies.into_keys().next(),
    })
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

/// Feature values for a dashboard. A field is present exactly when its flag
/// was set on the registration; an absent field means "not requested", never
/// "zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFeatures {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub temperature:       Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub precipitation:     Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub capital:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub coordinates:       Option<Coordinates>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub population:        Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub area:              Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_currencies: Option<BTreeMap<String, f64>>,
}

/// The enriched dashboard returned by `GET /dashboards/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedDashboard {
  pub country:      String,
  pub iso_code:     String,
  pub features:     DashboardFeatures,
  pub retrieved_at: DateTime<Utc>,
}
