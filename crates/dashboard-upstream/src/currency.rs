//! Client for the exchange-rate service.

use std::time::Duration;

use dashboard_core::upstream::{CurrencyProvider, ProviderError, RateTable};
use reqwest::{Client, Url};

use crate::{Result, http};

const PROBE_CURRENCY: &str = "NOK";

#[derive(Clone)]
pub struct CurrencyApi {
  client: Client,
  base:   Url,
}

impl CurrencyApi {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    Ok(Self {
      client: http::client(timeout)?,
      base:   http::base_url(base_url)?,
    })
  }
}

impl CurrencyProvider for CurrencyApi {
  /// `GET {base}/{code}`
  async fn rates(&self, base: &str) -> Result<RateTable, ProviderError> {
    let url = http::join(&self.base, &[base])?;
    http::get_json(self.client.get(url)).await
  }

  async fn probe(&self) -> Result<u16, ProviderError> {
    let url = http::join(&self.base, &[PROBE_CURRENCY])?;
    http::probe(self.client.get(url)).await
  }
}
