//! JSON REST API for the country dashboard service.
//!
//! Exposes an axum [`Router`] backed by any [`Backend`]: a store implementing
//! both store traits plus the three upstream providers. Lifecycle events are
//! handed to an [`EventSink`] and never awaited.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, dashboard_api::api_router(state)).await?;
//! ```

pub mod dashboards;
pub mod error;
pub mod notifications;
pub mod registrations;
pub mod status;

use std::{sync::Arc, time::Instant};

use axum::{Router, routing::get};
use dashboard_core::{
  event::EventSink,
  store::{RegistrationStore, SubscriberStore},
  upstream::{CountryProvider, CurrencyProvider, WeatherProvider},
};
use dashboard_engine::{Aggregator, IsoValidator};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Every route lives below this prefix.
pub const BASE_PATH: &str = "/dashboard/v1";

/// Reported by `GET /status`.
pub const API_VERSION: &str = "v1";

// ─── Backend ─────────────────────────────────────────────────────────────────

/// Names the concrete collaborators the handlers are generic over.
pub trait Backend: 'static {
  type Store: RegistrationStore + SubscriberStore + 'static;
  type Countries: CountryProvider;
  type Weather: WeatherProvider;
  type Currency: CurrencyProvider;
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<B: Backend> {
  pub store:      Arc<B::Store>,
  pub validator:  IsoValidator<B::Countries>,
  pub aggregator: Aggregator<B::Countries, B::Weather, B::Currency>,
  pub events:     Arc<dyn EventSink>,
  pub countries:  Arc<B::Countries>,
  pub weather:    Arc<B::Weather>,
  pub currency:   Arc<B::Currency>,
  pub started_at: Instant,
}

impl<B: Backend> AppState<B> {
  pub fn new(
    store: Arc<B::Store>,
    countries: Arc<B::Countries>,
    weather: Arc<B::Weather>,
    currency: Arc<B::Currency>,
    events: Arc<dyn EventSink>,
  ) -> Self {
    Self {
      validator: IsoValidator::new(Arc::clone(&countries)),
      aggregator: Aggregator::new(
        Arc::clone(&countries),
        Arc::clone(&weather),
        Arc::clone(&currency),
        Arc::clone(&events),
      ),
      store,
      events,
      countries,
      weather,
      currency,
      started_at: Instant::now(),
    }
  }
}

impl<B: Backend> Clone for AppState<B> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      validator:  self.validator.clone(),
      aggregator: self.aggregator.clone(),
      events:     Arc::clone(&self.events),
      countries:  Arc::clone(&self.countries),
      weather:    Arc::clone(&self.weather),
      currency:   Arc::clone(&self.currency),
      started_at: self.started_at,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router, nested under [`BASE_PATH`] and wrapped in a request
/// trace layer.
pub fn api_router<B: Backend>(state: AppState<B>) -> Router<()> {
  let v1 = Router::new()
    // Registrations
    .route(
      "/registrations",
      get(registrations::list::<B>).post(registrations::create::<B>),
    )
    .route(
      "/registrations/{id}",
      get(registrations::get_one::<B>)
        .put(registrations::update::<B>)
        .delete(registrations::remove::<B>),
    )
    // Dashboards
    .route("/dashboards/{id}", get(dashboards::get_one::<B>))
    // Notifications
    .route(
      "/notifications",
      get(notifications::list::<B>).post(notifications::create::<B>),
    )
    .route(
      "/notifications/{id}",
      get(notifications::get_one::<B>).delete(notifications::remove::<B>),
    )
    // Status
    .route("/status", get(status::handler::<B>))
    .with_state(state);

  Router::new()
    .nest(BASE_PATH, v1)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod fakes;
#[cfg(test)]
mod tests;
