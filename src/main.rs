//! Song Catalog Service
//!
//! A CRUD API over an in-memory song collection, with metrics, tracing and
//! Swagger UI.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                  SONG CATALOG                        │
//!                   │                                                      │
//!   Client Request  │  ┌───────────┐   ┌──────────────┐   ┌────────────┐  │
//!  ─────────────────┼─▶│ middleware│──▶│   handlers   │──▶│ repository │  │
//!                   │  │ req id,   │   │ list/create/ │   │ (in-memory)│  │
//!                   │  │ trace,    │   │ get/update/  │   └────────────┘  │
//!                   │  │ faults    │   │ delete       │                   │
//!                   │  └───────────┘   └──────┬───────┘                   │
//!   Client Response │                         │                           │
//!  ◀────────────────┼─────────────────────────┘                           │
//!                   │                                                      │
//!                   │  /metrics (Prometheus)   /swaggerui (OpenAPI docs)   │
//!                   │  app.log (file sink)     OTLP spans (optional)       │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use song_catalog::config::{load_config, CatalogConfig, ConfigWatcher};
use song_catalog::http::HttpServer;
use song_catalog::lifecycle::Shutdown;
use song_catalog::observability;

#[derive(Parser)]
#[command(name = "song-catalog")]
#[command(about = "Song catalog HTTP service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CatalogConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    let observability = observability::init(&config.observability)?;

    tracing::info!("song-catalog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        fault_injection = config.fault_injection.enabled,
        metrics_enabled = config.observability.metrics_enabled,
        docs_enabled = config.docs.enabled,
        "Configuration loaded"
    );

    // Hot reload is only available when a config file was given
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(watcher) => (updates, Some(watcher)),
                Err(e) => {
                    tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
                    (updates, None)
                }
            }
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config);
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    observability.shutdown();
    Ok(())
}
