//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, the feature set as compact JSON,
//! UUIDs as hyphenated lowercase strings and event tags in their wire form.

use chrono::{DateTime, Utc};
use dashboard_core::{
  event::Event,
  registration::{FeatureSet, Registration},
  subscriber::Subscriber,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_features(f: &FeatureSet) -> Result<String> {
  Ok(serde_json::to_string(f)?)
}

pub fn decode_features(s: &str) -> Result<FeatureSet> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_event(e: Event) -> &'static str {
  match e {
    Event::Register => "REGISTER",
    Event::Change => "CHANGE",
    Event::Delete => "DELETE",
    Event::Invoke => "INVOKE",
  }
}

pub fn decode_event(s: &str) -> Result<Event> { Ok(Event::parse(s)?) }

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const REGISTRATION_COLUMNS: &str =
  "registration_id, country, iso_code, features_json, last_change";

/// A `registrations` row as read from SQLite, before decoding.
pub struct RawRegistration {
  pub registration_id: String,
  pub country:         String,
  pub iso_code:        String,
  pub features_json:   String,
  pub last_change:     String,
}

impl RawRegistration {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawRegistration {
      registration_id: row.get(0)?,
      country:         row.get(1)?,
      iso_code:        row.get(2)?,
      features_json:   row.get(3)?,
      last_change:     row.get(4)?,
    })
  }

  pub fn into_registration(self) -> Result<Registration> {
    Ok(Registration {
      id:          decode_uuid(&self.registration_id)?,
      country:     self.country,
      iso_code:    self.iso_code,
      features:    decode_features(&self.features_json)?,
      last_change: decode_dt(&self.last_change)?,
    })
  }
}

pub const SUBSCRIBER_COLUMNS: &str = "subscriber_id, url, country, event";

/// A `subscribers` row as read from SQLite, before decoding.
pub struct RawSubscriber {
  pub subscriber_id: String,
  pub url:           String,
  pub country:       Option<String>,
  pub event:         String,
}

impl RawSubscriber {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawSubscriber {
      subscriber_id: row.get(0)?,
      url:           row.get(1)?,
      country:       row.get(2)?,
      event:         row.get(3)?,
    })
  }

  pub fn into_subscriber(self) -> Result<Subscriber> {
    Ok(Subscriber {
      id:      decode_uuid(&self.subscriber_id)?,
      url:     self.url,
      country: self.country,
      event:   decode_event(&self.event)?,
    })
  }
}
