//! Client for an Open-Meteo compatible forecast service.

use std::time::Duration;

use dashboard_core::upstream::{HourlySeries, ProviderError, WeatherProvider};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{Result, http};

/// The hourly variables requested from the forecast endpoint.
const HOURLY_VARIABLES: &str = "temperature_2m,precipitation";

#[derive(Deserialize)]
struct ForecastResponse {
  hourly: HourlySeries,
}

#[derive(Clone)]
pub struct OpenMeteo {
  client: Client,
  base:   Url,
}

impl OpenMeteo {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    Ok(Self {
      client: http::client(timeout)?,
      base:   http::base_url(base_url)?,
    })
  }
}

impl WeatherProvider for OpenMeteo {
  /// `GET {base}?latitude=..&longitude=..&hourly=temperature_2m,precipitation`
  ///
  /// Coordinates are sent with two decimals.
  async fn hourly(
    &self,
    latitude: f64,
    longitude: f64,
  ) -> Result<HourlySeries, ProviderError> {
    let req = self.client.get(self.base.clone()).query(&[
      ("latitude", format!("{latitude:.2}")),
      ("longitude", format!("{longitude:.2}")),
      ("hourly", HOURLY_VARIABLES.to_owned()),
    ]);
    let forecast: ForecastResponse = http::get_json(req).await?;
    Ok(forecast.hourly)
  }

  async fn probe(&self) -> Result<u16, ProviderError> {
    http::probe(self.client.get(self.base.clone())).await
  }
}
