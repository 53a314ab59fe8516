//! statefacts server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), loads the state
//! reference table, opens the SQLite fun-fact store, and serves the JSON API
//! over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use statefacts_api::AppState;
use statefacts_core::reference::ReferenceTable;
use statefacts_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "US state facts API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
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

  let table = match &server_cfg.states_path {
    Some(path) => {
      let path = expand_tilde(path);
      let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read state dataset {path:?}"))?;
      ReferenceTable::from_json(&json)
        .with_context(|| format!("failed to parse state dataset {path:?}"))?
    }
    None => ReferenceTable::embedded().context("bundled state dataset is invalid")?,
  };
  tracing::info!(states = table.len(), "reference table loaded");

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = if store_path.as_os_str() == ":memory:" {
    SqliteStore::open_in_memory().await
  } else {
    if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create store directory {dir:?}"))?;
    }
    SqliteStore::open(&store_path).await
  }
  .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState::new(Arc::new(store), Arc::new(table));
  let app = statefacts_api::api_router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
