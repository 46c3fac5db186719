//! Best-effort fan-out of lifecycle events to webhook subscribers.
//!
//! Each matching subscriber gets its own spawned task and exactly one delivery
//! attempt. Nothing is joined, retried or queued; outcomes are only logged.
//! The number of in-flight deliveries is unbounded.

use std::sync::Arc;

use chrono::Utc;
use dashboard_core::{
  event::{Event, EventSink, Notification},
  store::SubscriberStore,
  subscriber::Subscriber,
  upstream::WebhookSender,
};

/// Layout of [`Notification::time`].
pub const NOTIFICATION_TIME_FORMAT: &str = "%Y%m%d %H:%M";

pub struct Dispatcher<S, N> {
  store:  Arc<S>,
  sender: Arc<N>,
}

impl<S, N> Clone for Dispatcher<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      sender: Arc::clone(&self.sender),
    }
  }
}

impl<S, N> Dispatcher<S, N>
where
  S: SubscriberStore + 'static,
  N: WebhookSender,
{
  pub fn new(store: Arc<S>, sender: Arc<N>) -> Self { Self { store, sender } }

  /// Look up the subscribers for `event`, drop those scoped to another
  /// country and spawn one delivery per survivor.
  ///
  /// Returns once every delivery has been spawned, with the number spawned.
  /// A failed subscriber lookup is logged and counts as zero.
  pub async fn dispatch(&self, event: Event, country_code: &str) -> usize {
    let subscribers = match self.store.subscribers_for(event).await {
      Ok(subscribers) => subscribers,
      Err(e) => {
        tracing::warn!(%event, error = %e, "failed to load webhook subscribers");
        return 0;
      }
    };

    let time = Utc::now().format(NOTIFICATION_TIME_FORMAT).to_string();
    let mut spawned = 0;

    for subscriber in subscribers {
      if !subscriber.accepts(country_code) {
        continue;
      }
      let notification = Notification {
        id: subscriber.id,
        country: country_code.to_owned(),
        event,
        time: time.clone(),
      };
      tokio::spawn(deliver(Arc::clone(&self.sender), subscriber, notification));
      spawned += 1;
    }

    tracing::debug!(%event, country = %country_code, spawned, "webhook event dispatched");
    spawned
  }
}

async fn deliver<N: WebhookSender>(
  sender: Arc<N>,
  subscriber: Subscriber,
  notification: Notification,
) {
  match sender.deliver(&subscriber.url, &notification).await {
    Ok(status) => tracing::info!(
      url = %subscriber.url,
      event = %notification.event,
      status,
      "webhook delivered"
    ),
    Err(e) => tracing::warn!(
      url = %subscriber.url,
      event = %notification.event,
      error = %e,
      "webhook delivery failed"
    ),
  }
}

impl<S, N> EventSink for Dispatcher<S, N>
where
  S: SubscriberStore + 'static,
  N: WebhookSender,
{
  /// Runs [`Dispatcher::dispatch`] on a spawned task and returns immediately.
  fn trigger(&self, event: Event, country_code: &str) {
    let this = self.clone();
    let country_code = country_code.to_owned();
    tokio::spawn(async move {
      this.dispatch(event, &country_code).await;
    });
  }
}
