//! Configuration and wiring for the dashboard server binary.
//!
//! [`ServerConfig::load`] layers built-in defaults, an optional TOML file and
//! `DASHBOARD_*` environment variables. [`build_state`] turns a config and an
//! open store into the [`AppState`] the router runs on, with a webhook
//! [`Dispatcher`] as the event sink.

use std::{path::{Path, PathBuf}, sync::Arc, time::Duration};

use anyhow::Context as _;
use config::{Config, ConfigError, Environment, File};
use dashboard_api::{AppState, Backend};
use dashboard_engine::Dispatcher;
use dashboard_store_sqlite::SqliteStore;
use dashboard_upstream::{CurrencyApi, HttpWebhookSender, OpenMeteo, RestCountries};
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `DASHBOARD_PORT=9000`.
pub const ENV_PREFIX: &str = "DASHBOARD";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// REST Countries v3.1 base, without the trailing `/name`.
  pub countries_url:         String,
  /// Full forecast endpoint.
  pub weather_url:           String,
  pub currency_url:          String,
  pub upstream_timeout_secs: u64,
  pub webhook_timeout_secs:  u64,
}

impl ServerConfig {
  /// Defaults, overlaid with `file` if it exists, overlaid with the
  /// environment.
  pub fn load(file: &Path) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "dashboard.sqlite3")?
      .set_default("countries_url", "http://129.241.150.113:8080/v3.1")?
      .set_default("weather_url", "https://api.open-meteo.com/v1/forecast")?
      .set_default("currency_url", "http://129.241.150.113:9090/currency")?
      .set_default("upstream_timeout_secs", 30)?
      .set_default("webhook_timeout_secs", 10)?
      .add_source(File::from(file).required(false))
      .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Wiring ──────────────────────────────────────────────────────────────────

/// The production collaborators.
pub struct Live;

impl Backend for Live {
  type Store = SqliteStore;
  type Countries = RestCountries;
  type Weather = OpenMeteo;
  type Currency = CurrencyApi;
}

/// Build the upstream clients and the webhook dispatcher around `store`.
pub fn build_state(
  cfg: &ServerConfig,
  store: Arc<SqliteStore>,
) -> anyhow::Result<AppState<Live>> {
  let upstream_timeout = Duration::from_secs(cfg.upstream_timeout_secs);

  let countries = RestCountries::new(&cfg.countries_url, upstream_timeout)
    .context("failed to build country provider client")?;
  let weather = OpenMeteo::new(&cfg.weather_url, upstream_timeout)
    .context("failed to build weather provider client")?;
  let currency = CurrencyApi::new(&cfg.currency_url, upstream_timeout)
    .context("failed to build currency provider client")?;
  let sender = HttpWebhookSender::new(Duration::from_secs(cfg.webhook_timeout_secs))
    .context("failed to build webhook client")?;

  let dispatcher = Dispatcher::new(Arc::clone(&store), Arc::new(sender));

  Ok(AppState::new(
    store,
    Arc::new(countries),
    Arc::new(weather),
    Arc::new(currency),
    Arc::new(dispatcher),
  ))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
