//! Errors surfaced by the validator and the aggregator.

use dashboard_core::upstream::ProviderError;
use thiserror::Error;

/// Why a country / ISO code pair was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("country '{0}' is not recognized")]
  CountryNotRecognized(String),

  #[error("country provider unavailable: {0}")]
  UpstreamUnavailable(ProviderError),

  #[error("no data found for country: {0}")]
  NoDataFoundForCountry(String),

  #[error("malformed country provider response: {0}")]
  MalformedUpstreamResponse(String),

  #[error("ISO code '{given}' does not match country '{country}' (expected '{expected}')")]
  IsoCodeMismatch {
    country:  String,
    expected: String,
    given:    String,
  },
}

impl ValidationError {
  /// Whether the failure lies with an upstream provider rather than with the
  /// caller's input.
  pub fn is_upstream(&self) -> bool {
    matches!(
      self,
      Self::UpstreamUnavailable(_) | Self::MalformedUpstreamResponse(_)
    )
  }
}

/// The aggregation stage that failed. Every variant is terminal: no partial
/// dashboard is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
  #[error("failed to fetch country data: {0}")]
  CountryUnavailable(ProviderError),

  #[error("failed to fetch weather data: {0}")]
  WeatherUnavailable(ProviderError),

  #[error("failed to fetch currency data: {0}")]
  CurrencyUnavailable(ProviderError),
}
