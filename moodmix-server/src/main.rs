//! moodmix-server - HTTP service for mood-based playlists
//!
//! Loads the song catalog once, then answers recommendation requests built
//! from scene, emotion and object labels.

use anyhow::Result;
use clap::Parser;
use moodmix_common::config::{resolve_catalog_path, resolve_config_path, TomlConfig};
use moodmix_engine::MusicEngine;
use moodmix_server::{build_router, logging, AppState};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "moodmix-server", version, about = "Mood-based music recommendation service")]
struct Args {
    /// Song catalog CSV
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "MOODMIX_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log = logging::init_tracing("info");

    info!(
        "Starting moodmix-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config_path = resolve_config_path(args.config.as_deref());
    let config = TomlConfig::load_or_default(config_path.as_deref());
    log.apply_level(&config.logging.level);

    let catalog_path = resolve_catalog_path(args.catalog.as_deref(), &config);
    info!("Catalog path: {}", catalog_path.display());

    let load_path = catalog_path.clone();
    let engine = tokio::task::spawn_blocking(move || MusicEngine::load(&load_path)).await?;
    if engine.is_ready() {
        info!("✓ Catalog ready with {} songs", engine.catalog_size());
    } else {
        warn!("Serving without a catalog; playlists will be empty until a reload succeeds");
    }

    let state = AppState::new(engine, catalog_path);
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let bind = args.bind.unwrap_or(config.bind_address);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("moodmix-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("moodmix-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
