//! In-process test doubles for the upstream providers, the webhook sender and
//! the event sink.
//!
//! Compiled for this crate's tests and, behind the `testing` feature, for
//! downstream test suites.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use dashboard_core::{
  event::{Event, EventSink, Notification},
  upstream::{
    CountryName, CountryProvider, CountryRecord, CurrencyProvider, DeliveryError,
    HourlySeries, ProviderError, RateTable, WeatherProvider, WebhookSender,
  },
};
use tokio::sync::mpsc;

pub fn norway_record() -> CountryRecord {
  CountryRecord {
    name:       CountryName { common: "Norway".into() },
    cca2:       Some("NO".into()),
    capital:    vec!["Oslo".into()],
    latlng:     vec![62.0, 10.0],
    population: 5_379_475,
    area:       323_802.0,
    currencies: [("NOK".to_string(), Default::default())].into(),
  }
}

// ─── Providers ───────────────────────────────────────────────────────────────

pub struct FakeCountries {
  pub answer: Result<Vec<CountryRecord>, ProviderError>,
  pub calls:  AtomicUsize,
}

impl FakeCountries {
  pub fn answering(answer: Result<Vec<CountryRecord>, ProviderError>) -> Self {
    Self { answer, calls: AtomicUsize::new(0) }
  }

  pub fn norway() -> Self { Self::answering(Ok(vec![norway_record()])) }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl CountryProvider for FakeCountries {
  async fn lookup(&self, _name: &str) -> Result<Vec<CountryRecord>, ProviderError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.answer.clone()
  }

  async fn probe(&self) -> Result<u16, ProviderError> { Ok(200) }
}

pub struct FakeWeather {
  pub answer: Result<HourlySeries, ProviderError>,
  pub calls:  AtomicUsize,
}

impl FakeWeather {
  pub fn answering(answer: Result<HourlySeries, ProviderError>) -> Self {
    Self { answer, calls: AtomicUsize::new(0) }
  }

  pub fn mild() -> Self {
    Self::answering(Ok(HourlySeries {
      temperature:   vec![Some(2.0), Some(4.0), Some(6.0)],
      precipitation: vec![Some(0.0), Some(1.5), Some(0.0)],
    }))
  }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl WeatherProvider for FakeWeather {
  async fn hourly(&self, _lat: f64, _lng: f64) -> Result<HourlySeries, ProviderError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.answer.clone()
  }

  async fn probe(&self) -> Result<u16, ProviderError> { Ok(200) }
}

pub struct FakeCurrency {
  pub answer: Result<RateTable, ProviderError>,
  pub calls:  AtomicUsize,
  pub bases:  Mutex<Vec<String>>,
}

impl FakeCurrency {
  pub fn answering(answer: Result<RateTable, ProviderError>) -> Self {
    Self { answer, calls: AtomicUsize::new(0), bases: Mutex::default() }
  }

  pub fn krone() -> Self {
    Self::answering(Ok(RateTable {
      base:  "NOK".into(),
      rates: [
        ("EUR".to_string(), 0.087),
        ("USD".to_string(), 0.094),
        ("SEK".to_string(), 0.98),
      ]
      .into(),
    }))
  }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl CurrencyProvider for FakeCurrency {
  async fn rates(&self, base: &str) -> Result<RateTable, ProviderError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.bases.lock().unwrap().push(base.to_owned());
    self.answer.clone()
  }

  async fn probe(&self) -> Result<u16, ProviderError> { Ok(200) }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// Remembers every triggered event.
#[derive(Default)]
pub struct RecordingSink {
  pub events: Mutex<Vec<(Event, String)>>,
}

impl RecordingSink {
  pub fn take(&self) -> Vec<(Event, String)> {
    std::mem::take(&mut *self.events.lock().unwrap())
  }
}

impl EventSink for RecordingSink {
  fn trigger(&self, event: Event, country_code: &str) {
    self.events.lock().unwrap().push((event, country_code.to_owned()));
  }
}

/// Forwards each delivery to a channel, keyed on the URL:
///
/// - containing `fail`: refused with a 500 before anything is forwarded.
/// - containing `stall`: forwarded, then never completes.
/// - anything else: forwarded and answered with 200.
pub struct ChannelSender {
  tx: mpsc::UnboundedSender<(String, Notification)>,
}

impl ChannelSender {
  pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, Notification)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }
}

impl WebhookSender for ChannelSender {
  async fn deliver(
    &self,
    url: &str,
    notification: &Notification,
  ) -> Result<u16, DeliveryError> {
    if url.contains("fail") {
      return Err(DeliveryError::Status(500));
    }
    let _ = self.tx.send((url.to_owned(), notification.clone()));
    if url.contains("stall") {
      std::future::pending::<()>().await;
    }
    Ok(200)
  }
}
