//! doppel server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, starts the analysis worker pool, and serves the
//! HTTP API.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use doppel_analysis::{Analyzer, Dispatcher, WordCloudClient};
use doppel_server::{AppState, ServerConfig};
use doppel_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "doppel plagiarism analysis server")]
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DOPPEL"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in filesystem paths.
  server_cfg.store_path = expand_tilde(&server_cfg.store_path);
  server_cfg.uploads_dir = expand_tilde(&server_cfg.uploads_dir);

  tokio::fs::create_dir_all(&server_cfg.uploads_dir)
    .await
    .with_context(|| {
      format!("failed to create uploads dir {:?}", server_cfg.uploads_dir)
    })?;

  // Open SQLite store.
  let store = Arc::new(
    SqliteStore::open(&server_cfg.store_path)
      .await
      .with_context(|| {
        format!("failed to open store at {:?}", server_cfg.store_path)
      })?,
  );

  // Start the analysis pipeline and build application state.
  let analyzer = Analyzer::new(Arc::clone(&store));
  let dispatcher = Dispatcher::spawn(analyzer.clone(), server_cfg.analysis_workers);
  let wordcloud = WordCloudClient::new(server_cfg.wordcloud_endpoint.clone())
    .context("failed to build word cloud client")?;

  let state = AppState {
    store,
    analyzer,
    dispatcher,
    wordcloud,
    config: Arc::new(server_cfg),
  };

  let address = format!("{}:{}", state.config.host, state.config.port);
  let app = doppel_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
