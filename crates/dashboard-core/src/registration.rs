//! Registrations: the stored dashboard configurations.
//!
//! A registration names one country and a set of feature flags. The populated
//! dashboard is never stored; it is assembled on read from the flags.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Features ────────────────────────────────────────────────────────────────

/// Which enriched fields a dashboard should carry.
///
/// Every flag defaults to off and the currency set defaults to empty, so a
/// client may send a partial object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureSet {
  /// Mean hourly temperature in degrees Celsius.
  pub temperature:       bool,
  /// Mean hourly precipitation in millimetres.
  pub precipitation:     bool,
  pub capital:           bool,
  pub coordinates:       bool,
  pub population:        bool,
  pub area:              bool,
  /// ISO 4217 codes to report exchange rates for, relative to the country's
  /// own currency.
  pub target_currencies: BTreeSet<String>,
}

impl FeatureSet {
  /// Whether either weather flag is on. Both flags share one upstream call.
  pub fn needs_weather(&self) -> bool { self.temperature || self.precipitation }

  pub fn needs_currency(&self) -> bool { !self.target_currencies.is_empty() }

  /// Trim and uppercase every currency code, dropping blanks.
  pub fn normalized(mut self) -> Self {
    self.target_currencies = normalize_codes(self.target_currencies);
    self
  }
}

fn normalize_codes(codes: BTreeSet<String>) -> BTreeSet<String> {
  codes
    .into_iter()
    .map(|c| c.trim().to_ascii_uppercase())
    .filter(|c| !c.is_empty())
    .collect()
}

/// A partial update to a [`FeatureSet`]. Absent fields keep their stored
/// value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePatch {
  pub temperature:       Option<bool>,
  pub precipitation:     Option<bool>,
  pub capital:           Option<bool>,
  pub coordinates:       Option<bool>,
  pub population:        Option<bool>,
  pub area:              Option<bool>,
  pub target_currencies: Option<BTreeSet<String>>,
}

impl FeaturePatch {
  pub fn apply(self, features: &mut FeatureSet) {
    let flags = [
      (self.temperature, &mut features.temperature),
      (self.precipitation, &mut features.precipitation),
      (self.capital, &mut features.capital),
      (self.coordinates, &mut features.coordinates),
      (self.population, &mut features.population),
      (self.area, &mut features.area),
    ];
    for (patch, flag) in flags {
      if let Some(value) = patch {
        *flag = value;
      }
    }
    if let Some(codes) = self.target_currencies {
      features.target_currencies = normalize_codes(codes);
    }
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

/// A stored dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
  /// Store-assigned; never changes after creation.
  pub id:          Uuid,
  /// Human-readable country name, as accepted by the country provider.
  pub country:     String,
  /// ISO 3166-1 alpha-2 code; checked against `country` on every write.
  pub iso_code:    String,
  pub features:    FeatureSet,
  /// Store-assigned on every write.
  pub last_change: DateTime<Utc>,
}

/// Input to [`crate::store::RegistrationStore::create_registration`] and
/// [`crate::store::RegistrationStore::update_registration`].
/// `id` and `last_change` are always set by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
  #[serde(default)]
  pub country:  String,
  #[serde(default)]
  pub iso_code: String,
  #[serde(default)]
  pub features: FeatureSet,
}

impl From<Registration> for NewRegistration {
  fn from(r: Registration) -> Self {
    NewRegistration {
      country:  r.country,
      iso_code: r.iso_code,
      features: r.features,
    }
  }
}

/// A partial update to a registration, as accepted by `PUT`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPatch {
  pub country:  Option<String>,
  pub iso_code: Option<String>,
  pub features: Option<FeaturePatch>,
}
