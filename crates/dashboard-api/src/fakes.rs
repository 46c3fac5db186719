//! Canned upstream providers for router tests.

use dashboard_core::upstream::{
  CountryName, CountryProvider, CountryRecord, CurrencyProvider, HourlySeries,
  ProviderError, RateTable, WeatherProvider,
};
use dashboard_store_sqlite::SqliteStore;

use crate::Backend;

pub struct Fakes;

impl Backend for Fakes {
  type Store = SqliteStore;
  type Countries = FakeCountries;
  type Weather = FakeWeather;
  type Currency = FakeCurrency;
}

fn record(name: &str, code: &str, capital: &str, currency: &str) -> CountryRecord {
  CountryRecord {
    name:       CountryName { common: name.into() },
    cca2:       Some(code.into()),
    capital:    vec![capital.into()],
    latlng:     vec![60.0, 15.0],
    population: 1_000_000,
    area:       100_000.0,
    currencies: [(currency.to_string(), serde_json::json!({}))].into(),
  }
}

/// Knows Norway and Sweden; everything else is a 404. `down` makes every
/// call fail with a 503.
pub struct FakeCountries {
  pub down: bool,
}

impl CountryProvider for FakeCountries {
  async fn lookup(&self, name: &str) -> Result<Vec<CountryRecord>, ProviderError> {
    if self.down {
      return Err(ProviderError::Status(503));
    }
    match name.to_ascii_lowercase().as_str() {
      "norway" => Ok(vec![record("Norway", "NO", "Oslo", "NOK")]),
      "sweden" => Ok(vec![record("Sweden", "SE", "Stockholm", "SEK")]),
      _ => Err(ProviderError::NotFound),
    }
  }

  async fn probe(&self) -> Result<u16, ProviderError> {
    if self.down { Ok(503) } else { Ok(200) }
  }
}

/// Returns a fixed series, or fails every call when `down`.
pub struct FakeWeather {
  pub down: bool,
}

impl WeatherProvider for FakeWeather {
  async fn hourly(&self, _lat: f64, _lng: f64) -> Result<HourlySeries, ProviderError> {
    if self.down {
      return Err(ProviderError::Transport("connection refused".into()));
    }
    Ok(HourlySeries {
      temperature:   vec![Some(1.0), None, Some(3.0)],
      precipitation: vec![Some(0.0), Some(2.0)],
    })
  }

  async fn probe(&self) -> Result<u16, ProviderError> {
    if self.down {
      Err(ProviderError::Transport("connection refused".into()))
    } else {
      Ok(200)
    }
  }
}

pub struct FakeCurrency;

impl CurrencyProvider for FakeCurrency {
  async fn rates(&self, base: &str) -> Result<RateTable, ProviderError> {
    Ok(RateTable {
      base:  base.to_owned(),
      rates: [("EUR".to_string(), 0.5), ("USD".to_string(), 0.25)].into(),
    })
  }

  async fn probe(&self) -> Result<u16, ProviderError> { Ok(200) }
}
