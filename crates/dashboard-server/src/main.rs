//! dashboard-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `DASHBOARD_*`
//! environment overrides, opens the SQLite store and serves the dashboard API
//! over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use dashboard_server::{ServerConfig, build_state, expand_tilde};
use dashboard_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Country dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = build_state(&server_cfg, Arc::new(store))?;
  let app = dashboard_api::api_router(state);
  let address = server_cfg.address();

  tracing::info!(
    countries = %server_cfg.countries_url,
    weather = %server_cfg.weather_url,
    currency = %server_cfg.currency_url,
    "upstream providers configured"
  );
  tracing::info!("Listening on http://{address}{}", dashboard_api::BASE_PATH);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
