//! The `RegistrationStore` and `SubscriberStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `dashboard-store-sqlite`). Higher layers (`dashboard-engine`,
//! `dashboard-api`) depend on these abstractions, not on any concrete backend.
//!
//! Writes are last-writer-wins; there is no optimistic-concurrency token.

use std::future::Future;

use uuid::Uuid;

use crate::{
  event::Event,
  registration::{NewRegistration, Registration},
  subscriber::{NewSubscriber, Subscriber},
};

/// Storage for dashboard registrations.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RegistrationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new registration. The store assigns `id` and `last_change`.
  fn create_registration(
    &self,
    input: NewRegistration,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + '_;

  /// Retrieve a registration by id. Returns `None` if not found.
  fn get_registration(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Registration>, Self::Error>> + Send + '_;

  fn list_registrations(
    &self,
  ) -> impl Future<Output = Result<Vec<Registration>, Self::Error>> + Send + '_;

  /// Replace the stored fields of `id` and refresh `last_change`.
  /// Returns `None` if no such registration exists.
  fn update_registration(
    &self,
    id: Uuid,
    input: NewRegistration,
  ) -> impl Future<Output = Result<Option<Registration>, Self::Error>> + Send + '_;

  /// Remove a registration. Returns `false` if it did not exist.
  fn delete_registration(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// Storage for webhook subscribers.
pub trait SubscriberStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new subscriber. The store assigns `id`.
  fn create_subscriber(
    &self,
    input: NewSubscriber,
  ) -> impl Future<Output = Result<Subscriber, Self::Error>> + Send + '_;

  fn get_subscriber(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subscriber>, Self::Error>> + Send + '_;

  fn list_subscribers(
    &self,
  ) -> impl Future<Output = Result<Vec<Subscriber>, Self::Error>> + Send + '_;

  /// Remove a subscriber. Returns `false` if it did not exist.
  fn delete_subscriber(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every subscriber whose event tag equals `event`, regardless of country.
  fn subscribers_for(
    &self,
    event: Event,
  ) -> impl Future<Output = Result<Vec<Subscriber>, Self::Error>> + Send + '_;

  fn count_subscribers(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
