//! Client for a REST Countries v3.1 compatible service.

use std::time::Duration;

use dashboard_core::upstream::{CountryProvider, CountryRecord, ProviderError};
use reqwest::{Client, Url};

use crate::{Result, http};

/// Country used for reachability probes.
const PROBE_COUNTRY: &str = "norway";

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestCountries {
  client: Client,
  base:   Url,
}

impl RestCountries {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    Ok(Self {
      client: http::client(timeout)?,
      base:   http::base_url(base_url)?,
    })
  }
}

impl CountryProvider for RestCountries {
  /// `GET {base}/name/{name}`
  async fn lookup(&self, name: &str) -> Result<Vec<CountryRecord>, ProviderError> {
    let url = http::join(&self.base, &["name", name])?;
    tracing::debug!(%url, "country lookup");
    http::get_json(self.client.get(url)).await
  }

  async fn probe(&self) -> Result<u16, ProviderError> {
    let url = http::join(&self.base, &["name", PROBE_COUNTRY])?;
    http::probe(self.client.get(url)).await
  }
}
