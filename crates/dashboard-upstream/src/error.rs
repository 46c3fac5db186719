//! Construction errors for the upstream clients.
//!
//! Errors from individual calls are reported as
//! [`dashboard_core::upstream::ProviderError`] or
//! [`dashboard_core::upstream::DeliveryError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid base url {url:?}: {reason}")]
  BaseUrl { url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
