//! SQL schema for the dashboard SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS registrations (
    registration_id TEXT PRIMARY KEY,
    country         TEXT NOT NULL,
    iso_code        TEXT NOT NULL,
    features_json   TEXT NOT NULL,   -- JSON-encoded FeatureSet
    last_change     TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

-- Subscribers are never updated, only created and deleted.
CREATE TABLE IF NOT EXISTS subscribers (
    subscriber_id TEXT PRIMARY KEY,
    url           TEXT NOT NULL,
    country       TEXT,              -- NULL matches every country
    event         TEXT NOT NULL      -- 'REGISTER' | 'CHANGE' | 'DELETE' | 'INVOKE'
);

CREATE INDEX IF NOT EXISTS subscribers_event_idx ON subscribers(event);

PRAGMA user_version = 1;
";
