//! Pure data-shaping helpers shared by the aggregator.

use std::collections::{BTreeMap, BTreeSet};

use dashboard_core::{
  dashboard::{Coordinates, CountryInfo, DashboardFeatures},
  registration::FeatureSet,
  upstream::{HourlySeries, RateTable},
};

/// Mean temperature and precipitation over a forecast window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSummary {
  pub temperature:   f64,
  pub precipitation: f64,
}

impl WeatherSummary {
  /// Reduce an hourly series to its means. `None` if either series has no
  /// reported hours.
  pub fn from_series(series: &HourlySeries) -> Option<Self> {
    Some(WeatherSummary {
      temperature:   mean(&series.temperature)?,
      precipitation: mean(&series.precipitation)?,
    })
  }
}

/// Arithmetic mean of the reported values. Missing hours are skipped;
/// `None` when nothing is left.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
  let (sum, count) = values
    .iter()
    .flatten()
    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  (count > 0).then(|| sum / count as f64)
}

/// Keep exactly the requested codes. Codes the provider does not know are
/// dropped without error.
pub fn select_rates(
  table: RateTable,
  wanted: &BTreeSet<String>,
) -> BTreeMap<String, f64> {
  table
    .rates
    .into_iter()
    .filter(|(code, _)| wanted.contains(code))
    .collect()
}

/// Copy each value whose flag is set. Unset flags leave the field `None`.
///
/// `weather` and `rates` are only consulted for the flags that need them; the
/// caller is expected to have fetched them when those flags are on.
pub fn shape_features(
  flags: &FeatureSet,
  country: &CountryInfo,
  weather: Option<WeatherSummary>,
  rates: Option<BTreeMap<String, f64>>,
) -> DashboardFeatures {
  DashboardFeatures {
    temperature:       weather.filter(|_| flags.temperature).map(|w| w.temperature),
    precipitation:     weather
      .filter(|_| flags.precipitation)
      .map(|w| w.precipitation),
    capital:           flags.capital.then(|| country.capital.clone()),
    coordinates:       flags.coordinates.then_some(Coordinates {
      latitude:  country.latitude,
      longitude: country.longitude,
    }),
    population:        flags.population.then_some(country.population),
    area:              flags.area.then_some(country.area),
    target_currencies: rates.filter(|_| flags.needs_currency()),
  }
}
