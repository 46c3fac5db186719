//! Cross-checks a country name against its ISO 3166-1 alpha-2 code.

use std::sync::Arc;

use dashboard_core::upstream::{CountryProvider, ProviderError};

use crate::error::ValidationError;

/// Guards registration writes: the stored `isoCode` must be the code the
/// country provider reports for `country`.
pub struct IsoValidator<C> {
  countries: Arc<C>,
}

impl<C> Clone for IsoValidator<C> {
  fn clone(&self) -> Self { Self { countries: Arc::clone(&self.countries) } }
}

impl<C: CountryProvider> IsoValidator<C> {
  pub fn new(countries: Arc<C>) -> Self { Self { countries } }

  /// Succeeds when the provider's code for `country` equals `iso_code`,
  /// ignoring ASCII case. Has no side effects.
  pub async fn validate(
    &self,
    country: &str,
    iso_code: &str,
  ) -> Result<(), ValidationError> {
    let records = match self.countries.lookup(country).await {
      Ok(records) => records,
      Err(ProviderError::NotFound) => {
        return Err(ValidationError::CountryNotRecognized(country.to_owned()));
      }
      Err(ProviderError::Malformed(reason)) => {
        return Err(ValidationError::MalformedUpstreamResponse(reason));
      }
      Err(e) => return Err(ValidationError::UpstreamUnavailable(e)),
    };

    let first = records
      .into_iter()
      .next()
      .ok_or_else(|| ValidationError::NoDataFoundForCountry(country.to_owned()))?;

    let expected = first
      .cca2
      .filter(|code| !code.trim().is_empty())
      .ok_or_else(|| {
        ValidationError::MalformedUpstreamResponse(
          "ISO code (cca2) not found in response".into(),
        )
      })?;

    if !expected.trim().eq_ignore_ascii_case(iso_code.trim()) {
      tracing::debug!(%country, %expected, given = %iso_code, "ISO code mismatch");
      return Err(ValidationError::IsoCodeMismatch {
        country: country.to_owned(),
        expected,
        given: iso_code.to_owned(),
      });
    }

    Ok(())
  }
}
