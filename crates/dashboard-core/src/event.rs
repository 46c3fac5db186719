//! Lifecycle events and the notification payload sent to subscribers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Why a notification fired.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Event {
  /// A registration was created.
  Register,
  /// A registration was updated.
  Change,
  /// A registration was deleted.
  Delete,
  /// A populated dashboard was retrieved.
  Invoke,
}

impl Event {
  /// Parse a stored tag, mapping failures into the crate error.
  pub fn parse(tag: &str) -> crate::Result<Self> {
    Self::from_str(tag).map_err(|_| Error::UnknownEvent(tag.to_owned()))
  }
}

/// The JSON body POSTed to a subscriber's URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  /// The subscriber's id, so a receiver can tell its hooks apart.
  pub id:      Uuid,
  /// The ISO code of the country the event concerns.
  pub country: String,
  pub event:   Event,
  /// Formatted `%Y%m%d %H:%M`, UTC.
  pub time:    String,
}

/// Something that accepts lifecycle events without making the caller wait.
///
/// `trigger` must return promptly; delivery happens off the caller's path and
/// its outcome is never reported back.
pub trait EventSink: Send + Sync {
  fn trigger(&self, event: Event, country_code: &str);
}
