//! reqwest-backed clients for the upstream providers and webhook delivery.
//!
//! | Type | Contract | Endpoint |
//! |------|----------|----------|
//! | [`RestCountries`] | `CountryProvider` | `GET {base}/name/{country}` |
//! | [`OpenMeteo`] | `WeatherProvider` | `GET {base}?latitude&longitude&hourly=...` |
//! | [`CurrencyApi`] | `CurrencyProvider` | `GET {base}/{code}` |
//! | [`HttpWebhookSender`] | `WebhookSender` | `POST {subscriber url}` |

mod http;

pub mod countries;
pub mod currency;
pub mod error;
pub mod weather;
pub mod webhook;

pub use countries::RestCountries;
pub use currency::CurrencyApi;
pub use error::{Error, Result};
pub use weather::OpenMeteo;
pub use webhook::HttpWebhookSender;

#[cfg(test)]
mod mock;
