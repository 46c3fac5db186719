//! Builds a [`PopulatedDashboard`] from a stored registration.
//!
//! Upstream calls are made one after another and only when a feature flag
//! needs them:
//!
//! | Provider | Called when |
//! |----------|-------------|
//! | country  | always |
//! | weather  | `temperature` or `precipitation` |
//! | currency | `targetCurrencies` is non-empty |
//!
//! Any upstream failure aborts the build; there is no partial dashboard.

use std::sync::Arc;

use chrono::Utc;
use dashboard_core::{
  dashboard::{CountryInfo, PopulatedDashboard},
  event::{Event, EventSink},
  registration::Registration,
  upstream::{CountryProvider, CurrencyProvider, ProviderError, WeatherProvider},
};

use crate::{
  error::AggregationError,
  shape::{WeatherSummary, select_rates, shape_features},
};

pub struct Aggregator<C, W, X> {
  countries: Arc<C>,
  weather:   Arc<W>,
  currency:  Arc<X>,
  events:    Arc<dyn EventSink>,
}

impl<C, W, X> Clone for Aggregator<C, W, X> {
  fn clone(&self) -> Self {
    Self {
      countries: Arc::clone(&self.countries),
      weather:   Arc::clone(&self.weather),
      currency:  Arc::clone(&self.currency),
      events:    Arc::clone(&self.events),
    }
  }
}

impl<C, W, X> Aggregator<C, W, X>
where
  C: CountryProvider,
  W: WeatherProvider,
  X: CurrencyProvider,
{
  pub fn new(
    countries: Arc<C>,
    weather: Arc<W>,
    currency: Arc<X>,
    events: Arc<dyn EventSink>,
  ) -> Self {
    Self { countries, weather, currency, events }
  }

  /// Fetch what `registration`'s flags need and shape the dashboard.
  ///
  /// On success an [`Event::Invoke`] is handed to the event sink; delivery
  /// does not delay the returned dashboard.
  pub async fn build(
    &self,
    registration: &Registration,
  ) -> Result<PopulatedDashboard, AggregationError> {
    let flags = &registration.features;

    let country = self
      .country_info(&registration.country)
      .await
      .map_err(AggregationError::CountryUnavailable)?;

    let weather = if flags.needs_weather() {
      Some(
        self
          .weather_summary(&country)
          .await
          .map_err(AggregationError::WeatherUnavailable)?,
      )
    } else {
      None
    };

    let rates = if flags.needs_currency() {
      let base = country.base_currency.as_deref().ok_or_else(|| {
        AggregationError::CurrencyUnavailable(ProviderError::Malformed(format!(
          "{} lists no currency",
          country.name
        )))
      })?;
      let table = self
        .currency
        .rates(base)
        .await
        .map_err(AggregationError::CurrencyUnavailable)?;
      Some(select_rates(table, &flags.target_currencies))
    } else {
      None
    };

    let dashboard = PopulatedDashboard {
      features:     shape_features(flags, &country, weather, rates),
      country:      country.name,
      iso_code:     country.iso_code,
      retrieved_at: Utc::now(),
    };

    self.events.trigger(Event::Invoke, &dashboard.iso_code);
    Ok(dashboard)
  }

  async fn country_info(&self, name: &str) -> Result<CountryInfo, ProviderError> {
    let record = self
      .countries
      .lookup(name)
      .await?
      .into_iter()
      .next()
      .ok_or(ProviderError::NotFound)?;
    CountryInfo::try_from(record)
  }

  async fn weather_summary(
    &self,
    country: &CountryInfo,
  ) -> Result<WeatherSummary, ProviderError> {
    let series = self
      .weather
      .hourly(country.latitude, country.longitude)
      .await?;
    WeatherSummary::from_series(&series)
      .ok_or_else(|| ProviderError::Malformed("hourly series has no reported values".into()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use dashboard_core::{registration::FeatureSet, upstream::HourlySeries};
  use uuid::Uuid;

  use crate::fakes::{FakeCountries, FakeCurrency, FakeWeather, RecordingSink, norway_record};

  struct Harness {
    countries: Arc<FakeCountries>,
    weather:   Arc<FakeWeather>,
    currency:  Arc<FakeCurrency>,
    sink:      Arc<RecordingSink>,
  }

  impl Harness {
    fn new(countries: FakeCountries, weather: FakeWeather, currency: FakeCurrency) -> Self {
      Self {
        countries: Arc::new(countries),
        weather:   Arc::new(weather),
        currency:  Arc::new(currency),
        sink:      Arc::new(RecordingSink::default()),
      }
    }

    fn healthy() -> Self {
      Self::new(FakeCountries::norway(), FakeWeather::mild(), FakeCurrency::krone())
    }

    fn aggregator(&self) -> Aggregator<FakeCountries, FakeWeather, FakeCurrency> {
      Aggregator::new(
        self.countries.clone(),
        self.weather.clone(),
        self.currency.clone(),
        self.sink.clone(),
      )
    }
  }

  fn registration(features: FeatureSet) -> Registration {
    Registration {
      id: Uuid::new_v4(),
      country: "Norway".into(),
      iso_code: "NO".into(),
      features,
      last_change: Utc::now(),
    }
  }

  #[tokio::test]
  async fn country_only_flags_call_only_the_country_provider() {
    let h = Harness::healthy();
    let reg = registration(FeatureSet {
      capital: true,
      coordinates: true,
      population: true,
      area: true,
      ..FeatureSet::default()
    });

    let dashboard = h.aggregator().build(&reg).await.unwrap();

    assert_eq!(h.countries.calls(), 1);
    assert_eq!(h.weather.calls(), 0);
    assert_eq!(h.currency.calls(), 0);
    assert_eq!(dashboard.features.capital.as_deref(), Some("Oslo"));
    assert_eq!(dashboard.features.population, Some(5_379_475));
    assert_eq!(dashboard.features.temperature, None);
  }

  #[tokio::test]
  async fn both_weather_flags_share_one_call() {
    let h = Harness::healthy();
    let reg = registration(FeatureSet {
      temperature: true,
      precipitation: true,
      ..FeatureSet::default()
    });

    let dashboard = h.aggregator().build(&reg).await.unwrap();

    assert_eq!(h.weather.calls(), 1);
    assert_eq!(dashboard.features.temperature, Some(4.0));
    assert_eq!(dashboard.features.precipitation, Some(0.5));
  }

  #[tokio::test]
  async fn precipitation_alone_omits_temperature() {
    let h = Harness::healthy();
    let reg = registration(FeatureSet {
      precipitation: true,
      ..FeatureSet::default()
    });

    let dashboard = h.aggregator().build(&reg).await.unwrap();
    assert_eq!(dashboard.features.temperature, None);
    assert!(dashboard.features.precipitation.is_some());
  }

  #[tokio::test]
  async fn currencies_are_filtered_to_the_requested_codes() {
    let h = Harness::healthy();
    let reg = registration(FeatureSet {
      target_currencies: ["EUR".to_string(), "JPY".to_string()].into(),
      ..FeatureSet::default()
    });

    let dashboard = h.aggregator().build(&reg).await.unwrap();

    let rates = dashboard.features.target_currencies.unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates["EUR"], 0.087);
    assert_eq!(*h.currency.bases.lock().unwrap(), vec!["NOK".to_string()]);
  }

  #[tokio::test]
  async fn unknown_country_is_terminal() {
    let h = Harness::new(
      FakeCountries::answering(Err(ProviderError::NotFound)),
      FakeWeather::mild(),
      FakeCurrency::krone(),
    );
    let reg = registration(FeatureSet { temperature: true, ..FeatureSet::default() });

    let err = h.aggregator().build(&reg).await.unwrap_err();
    assert_eq!(err, AggregationError::CountryUnavailable(ProviderError::NotFound));
    assert_eq!(h.weather.calls(), 0);
    assert!(h.sink.take().is_empty());
  }

  #[tokio::test]
  async fn empty_country_result_is_terminal() {
    let h = Harness::new(
      FakeCountries::answering(Ok(vec![])),
      FakeWeather::mild(),
      FakeCurrency::krone(),
    );
    let err = h
      .aggregator()
      .build(&registration(FeatureSet::default()))
      .await
      .unwrap_err();
    assert!(matches!(err, AggregationError::CountryUnavailable(_)));
  }

  #[tokio::test]
  async fn empty_weather_series_fails_even_when_others_succeed() {
    let h = Harness::new(
      FakeCountries::norway(),
      FakeWeather::answering(Ok(HourlySeries::default())),
      FakeCurrency::krone(),
    );
    let reg = registration(FeatureSet {
      temperature: true,
      target_currencies: ["EUR".to_string()].into(),
      ..FeatureSet::default()
    });

    let err = h.aggregator().build(&reg).await.unwrap_err();
    assert!(matches!(err, AggregationError::WeatherUnavailable(_)));
    assert_eq!(h.currency.calls(), 0);
    assert!(h.sink.take().is_empty());
  }

  #[tokio::test]
  async fn missing_hours_are_left_out_of_the_means() {
    let h = Harness::new(
      FakeCountries::norway(),
      FakeWeather::answering(Ok(HourlySeries {
        temperature:   vec![Some(1.0), None, Some(5.0)],
        precipitation: vec![None, Some(2.0)],
      })),
      FakeCurrency::krone(),
    );
    let reg = registration(FeatureSet {
      temperature: true,
      precipitation: true,
      ..FeatureSet::default()
    });

    let dashboard = h.aggregator().build(&reg).await.unwrap();
    assert_eq!(dashboard.features.temperature, Some(3.0));
    assert_eq!(dashboard.features.precipitation, Some(2.0));
  }

  #[tokio::test]
  async fn series_without_any_reported_hour_is_terminal() {
    let h = Harness::new(
      FakeCountries::norway(),
      FakeWeather::answering(Ok(HourlySeries {
        temperature:   vec![None, None],
        precipitation: vec![None, None],
      })),
      FakeCurrency::krone(),
    );
    let reg = registration(FeatureSet { temperature: true, ..FeatureSet::default() });

    let err = h.aggregator().build(&reg).await.unwrap_err();
    assert!(matches!(err, AggregationError::WeatherUnavailable(_)));
  }

  #[tokio::test]
  async fn currency_failure_is_terminal() {
    let h = Harness::new(
      FakeCountries::norway(),
      FakeWeather::mild(),
      FakeCurrency::answering(Err(ProviderError::Transport("refused".into()))),
    );
    let reg = registration(FeatureSet {
      capital: true,
      target_currencies: ["EUR".to_string()].into(),
      ..FeatureSet::default()
    });

    let err = h.aggregator().build(&reg).await.unwrap_err();
    assert!(matches!(err, AggregationError::CurrencyUnavailable(_)));
  }

  #[tokio::test]
  async fn country_without_currency_fails_when_rates_are_requested() {
    let mut record = norway_record();
    record.currencies.clear();
    let h = Harness::new(
      FakeCountries::answering(Ok(vec![record])),
      FakeWeather::mild(),
      FakeCurrency::krone(),
    );
    let reg = registration(FeatureSet {
      capital: true,
      target_currencies: ["EUR".to_string()].into(),
      ..FeatureSet::default()
    });

    let err = h.aggregator().build(&reg).await.unwrap_err();
    assert!(matches!(
      err,
      AggregationError::CurrencyUnavailable(ProviderError::Malformed(_))
    ));
    assert_eq!(h.currency.calls(), 0);
    assert!(h.sink.take().is_empty());
  }

  #[tokio::test]
  async fn country_without_currency_is_fine_when_no_rates_are_requested() {
    let mut record = norway_record();
    record.currencies.clear();
    let h = Harness::new(
      FakeCountries::answering(Ok(vec![record])),
      FakeWeather::mild(),
      FakeCurrency::krone(),
    );
    let reg = registration(FeatureSet { capital: true, ..FeatureSet::default() });

    let dashboard = h.aggregator().build(&reg).await.unwrap();
    assert_eq!(dashboard.features.target_currencies, None);
  }

  #[tokio::test]
  async fn success_emits_one_invoke_with_the_iso_code() {
    let h = Harness::healthy();
    let dashboard = h
      .aggregator()
      .build(&registration(FeatureSet::default()))
      .await
      .unwrap();

    assert_eq!(dashboard.country, "Norway");
    assert_eq!(dashboard.iso_code, "NO");
    assert_eq!(h.sink.take(), vec![(Event::Invoke, "NO".to_string())]);
  }
}
