//! songs-api - HTTP API over the song catalog
//!
//! Resolves configuration, opens the song store (optionally seeding it from a
//! JSON file) and serves the API until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use songs_common::config::{ConfigOverrides, ServiceConfig};
use songs_common::db::{init_database, load_songs_file, seed_songs};
use songs_api::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for songs-api
#[derive(Parser, Debug)]
#[command(name = "songs-api")]
#[command(about = "HTTP API for browsing and rating songs")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file holding the song collection
    #[arg(short, long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// JSON array of songs to insert before serving
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::resolve(&ConfigOverrides {
        config_file: args.config,
        database_path: args.database,
        host: args.host,
        port: args.port,
        log_level: args.log_level,
    })
    .context("Failed to resolve configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting songs-api v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("SONGS_BUILD_INFO")
    );
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open song database")?;

    if let Some(seed_path) = &args.seed {
        let songs = load_songs_file(seed_path)
            .with_context(|| format!("Failed to read seed file {}", seed_path.display()))?;
        seed_songs(&pool, &songs)
            .await
            .context("Failed to seed songs")?;
        info!("Loaded {} songs from {}", songs.len(), seed_path.display());
    }

    let app = build_router(AppState::new(pool.clone()));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("songs-api listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
