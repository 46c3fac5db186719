//! POSTs notifications to subscriber URLs.

use std::time::Duration;

use dashboard_core::{
  event::Notification,
  upstream::{DeliveryError, WebhookSender},
};
use reqwest::Client;

use crate::{Result, http};

/// Per-delivery timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpWebhookSender {
  client: Client,
}

impl HttpWebhookSender {
  pub fn new(timeout: Duration) -> Result<Self> {
    Ok(Self { client: http::client(timeout)? })
  }
}

impl WebhookSender for HttpWebhookSender {
  /// One attempt, JSON body, no retry.
  async fn deliver(
    &self,
    url: &str,
    notification: &Notification,
  ) -> Result<u16, DeliveryError> {
    let resp = self
      .client
      .post(url)
      .json(notification)
      .send()
      .await
      .map_err(|e| {
        if e.is_timeout() {
          DeliveryError::Timeout
        } else {
          DeliveryError::Transport(e.to_string())
        }
      })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(DeliveryError::Status(status.as_u16()));
    }
    Ok(status.as_u16())
  }
}
