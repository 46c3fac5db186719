//! [`SqliteStore`], the SQLite implementation of [`RegistrationStore`] and
//! [`SubscriberStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use dashboard_core::{
  event::Event,
  registration::{NewRegistration, Registration},
  store::{RegistrationStore, SubscriberStore},
  subscriber::{NewSubscriber, Subscriber},
};

use crate::{
  encode::{
    encode_dt, encode_event, encode_features, encode_uuid, RawRegistration,
    RawSubscriber, REGISTRATION_COLUMNS, SUBSCRIBER_COLUMNS,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Registrations and subscribers backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert `registration` as a new row.
  async fn insert_registration(&self, registration: &Registration) -> Result<()> {
    let id_str       = encode_uuid(registration.id);
    let country      = registration.country.clone();
    let iso_code     = registration.iso_code.clone();
    let features_str = encode_features(&registration.features)?;
    let changed_str  = encode_dt(registration.last_change);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO registrations (
             registration_id, country, iso_code, features_json, last_change
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, country, iso_code, features_str, changed_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete the row with `id` from `table`; returns whether one was removed.
  async fn delete_row(
    &self,
    table:     &'static str,
    id_column: &'static str,
    id:        Uuid,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        let sql = format!("DELETE FROM {table} WHERE {id_column} = ?1");
        Ok(conn.execute(&sql, rusqlite::params![id_str])?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn query_subscribers(&self, event: Option<Event>) -> Result<Vec<Subscriber>> {
    let event_str = event.map(encode_event);

    let raws: Vec<RawSubscriber> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(e) = event_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE event = ?1"
          ))?;
          stmt
            .query_map(rusqlite::params![e], RawSubscriber::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {SUBSCRIBER_COLUMNS} FROM subscribers"))?;
          stmt
            .query_map([], RawSubscriber::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscriber::into_subscriber).collect()
  }
}

// ─── RegistrationStore impl ──────────────────────────────────────────────────

impl RegistrationStore for SqliteStore {
  type Error = crate::Error;

  async fn create_registration(&self, input: NewRegistration) -> Result<Registration> {
    let registration = Registration {
      id:          Uuid::new_v4(),
      country:     input.country,
      iso_code:    input.iso_code,
      features:    input.features,
      last_change: Utc::now(),
    };

    self.insert_registration(&registration).await?;
    Ok(registration)
  }

  async fn get_registration(&self, id: Uuid) -> Result<Option<Registration>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRegistration> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE registration_id = ?1"
            ),
            rusqlite::params![id_str],
            RawRegistration::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRegistration::into_registration).transpose()
  }

  async fn list_registrations(&self) -> Result<Vec<Registration>> {
    let raws: Vec<RawRegistration> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REGISTRATION_COLUMNS} FROM registrations ORDER BY last_change"
        ))?;
        let rows = stmt
          .query_map([], RawRegistration::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRegistration::into_registration).collect()
  }

  async fn update_registration(
    &self,
    id:    Uuid,
    input: NewRegistration,
  ) -> Result<Option<Registration>> {
    let registration = Registration {
      id,
      country: input.country,
      iso_code: input.iso_code,
      features: input.features,
      last_change: Utc::now(),
    };

    let id_str       = encode_uuid(id);
    let country      = registration.country.clone();
    let iso_code     = registration.iso_code.clone();
    let features_str = encode_features(&registration.features)?;
    let changed_str  = encode_dt(registration.last_change);

    // Existence check and write in one statement, so a concurrent delete
    // cannot be undone.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE registrations
             SET country = ?2, iso_code = ?3, features_json = ?4, last_change = ?5
           WHERE registration_id = ?1",
          rusqlite::params![id_str, country, iso_code, features_str, changed_str],
        )?)
      })
      .await?;

    Ok((changed > 0).then_some(registration))
  }

  async fn delete_registration(&self, id: Uuid) -> Result<bool> {
    self.delete_row("registrations", "registration_id", id).await
  }
}

// ─── SubscriberStore impl ────────────────────────────────────────────────────

impl SubscriberStore for SqliteStore {
  type Error = crate::Error;

  async fn create_subscriber(&self, input: NewSubscriber) -> Result<Subscriber> {
    let subscriber = Subscriber {
      id:      Uuid::new_v4(),
      url:     input.url,
      country: input.country,
      event:   input.event,
    };

    let id_str    = encode_uuid(subscriber.id);
    let url       = subscriber.url.clone();
    let country   = subscriber.country.clone();
    let event_str = encode_event(subscriber.event);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscribers (subscriber_id, url, country, event)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, url, country, event_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(subscriber)
  }

  async fn get_subscriber(&self, id: Uuid) -> Result<Option<Subscriber>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubscriber> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE subscriber_id = ?1"
            ),
            rusqlite::params![id_str],
            RawSubscriber::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubscriber::into_subscriber).transpose()
  }

  async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
    self.query_subscribers(None).await
  }

  async fn delete_subscriber(&self, id: Uuid) -> Result<bool> {
    self.delete_row("subscribers", "subscriber_id", id).await
  }

  async fn subscribers_for(&self, event: Event) -> Result<Vec<Subscriber>> {
    self.query_subscribers(Some(event)).await
  }

  async fn count_subscribers(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM subscribers", [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }
}
