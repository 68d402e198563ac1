//! census-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store (or an in-memory one with `--memory`), seeds the
//! configured countries, and serves the JSON API under `/api`.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use census_api::{AppState, api_router};
use census_core::{
  Error,
  country::CountryAddRequest,
  memory::MemoryStore,
  repository::{CountriesRepository, PersonsRepository},
  service::CountryService,
};
use census_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Census person/country registry")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Keep everything in memory instead of opening the SQLite store.
  #[arg(long)]
  memory: bool,
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
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  if cli.memory {
    tracing::info!("using in-memory store");
    serve(Arc::new(MemoryStore::new()), &server_cfg).await
  } else {
    let store_path = server_cfg.store_path();
    let store = SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?;
    tracing::info!(?store_path, "opened SQLite store");
    serve(Arc::new(store), &server_cfg).await
  }
}

async fn serve<S>(store: Arc<S>, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: PersonsRepository + CountriesRepository + 'static,
{
  let state = AppState::new(Arc::clone(&store), store);
  seed_countries(&state.countries, &server_cfg.seed_countries).await?;

  let app = Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Add each configured country, skipping names that are already stored.
async fn seed_countries<C: CountriesRepository>(
  countries: &CountryService<C>,
  names: &[String],
) -> anyhow::Result<()> {
  for name in names {
    match countries.add_country(Some(CountryAddRequest::new(name.as_str()))).await {
      Ok(_) => {}
      Err(Error::DuplicateEntity(_)) => {
        tracing::info!(country_name = %name, "seed country already present");
      }
      Err(e) => {
        return Err(e).with_context(|| format!("failed to seed country {name:?}"));
      }
    }
  }
  Ok(())
}
