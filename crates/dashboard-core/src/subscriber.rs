//! Subscribers: webhook endpoints interested in one event type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// A stored webhook registration. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
  pub id:      Uuid,
  /// Target of the notification POST.
  pub url:     String,
  /// Restrict to one country's ISO code; `None` matches every country.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub country: Option<String>,
  pub event:   Event,
}

impl Subscriber {
  /// Whether an event for `country_code` should be delivered here.
  ///
  /// Both sides are trimmed and uppercased before comparing, so `"no"` and
  /// `"NO "` match `"NO"`.
  pub fn accepts(&self, country_code: &str) -> bool {
    match self.country.as_deref().map(canonical_code) {
      None => true,
      Some(own) if own.is_empty() => true,
      Some(own) => own == canonical_code(country_code),
    }
  }
}

/// Input to [`crate::store::SubscriberStore::create_subscriber`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubscriber {
  #[serde(default)]
  pub url:     String,
  #[serde(default)]
  pub country: Option<String>,
  pub event:   Event,
}

impl NewSubscriber {
  /// Trim the URL and fold a blank country into "all countries".
  pub fn normalized(mut self) -> Self {
    self.url = self.url.trim().to_owned();
    self.country = self
      .country
      .map(|c| c.trim().to_owned())
      .filter(|c| !c.is_empty());
    self
  }
}

fn canonical_code(code: &str) -> String { code.trim().to_ascii_uppercase() }
