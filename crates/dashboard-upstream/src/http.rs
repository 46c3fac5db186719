//! Request plumbing shared by the provider clients.

use std::time::Duration;

use dashboard_core::upstream::ProviderError;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

pub fn client(timeout: Duration) -> Result<Client> {
  Ok(Client::builder().timeout(timeout).build()?)
}

/// Parse a configured base URL, rejecting ones that cannot carry a path.
pub fn base_url(raw: &str) -> Result<Url> {
  let url = Url::parse(raw).map_err(|e| Error::BaseUrl {
    url:    raw.to_owned(),
    reason: e.to_string(),
  })?;
  if url.cannot_be_a_base() {
    return Err(Error::BaseUrl {
      url:    raw.to_owned(),
      reason: "cannot be a base".into(),
    });
  }
  Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub fn join(base: &Url, segments: &[&str]) -> Result<Url, ProviderError> {
  let mut url = base.clone();
  url
    .path_segments_mut()
    .map_err(|()| ProviderError::Transport(format!("{base} cannot be a base")))?
    .pop_if_empty()
    .extend(segments);
  Ok(url)
}

pub fn transport(e: reqwest::Error) -> ProviderError {
  ProviderError::Transport(e.to_string())
}

/// Send `req` and decode a JSON body, mapping 404 and every other
/// non-success status onto [`ProviderError`].
pub async fn get_json<T: DeserializeOwned>(
  req: RequestBuilder,
) -> Result<T, ProviderError> {
  let resp = req.send().await.map_err(transport)?;
  let status = resp.status();
  if status == StatusCode::NOT_FOUND {
    return Err(ProviderError::NotFound);
  }
  if !status.is_success() {
    return Err(ProviderError::Status(status.as_u16()));
  }
  let body = resp.bytes().await.map_err(transport)?;
  serde_json::from_slice(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
}

/// Send `req` and report whatever status comes back.
pub async fn probe(req: RequestBuilder) -> Result<u16, ProviderError> {
  let resp = req.send().await.map_err(transport)?;
  Ok(resp.status().as_u16())
}
