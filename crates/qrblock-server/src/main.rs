//! # qrblock-server
//!
//! HTTP host for the QR code course block.
//!
//! This binary provides:
//! - REST API resolving block configurations into template data
//! - OpenAPI documentation via Swagger UI
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! QRBLOCK__SITE__WWWROOT=https://lms.example.org cargo run --package qrblock-server
//!
//! # Production
//! QRBLOCK_ENV=production QRBLOCK_CONFIG=/etc/qrblock/qrblock.toml ./qrblock-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;

use anyhow::Context;
use qrblock_core::{default_catalog_path, default_settings_path, FileCatalog, Settings};
use qrblock_server::state::AppState;
use qrblock_server::{api, logging};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Environment variable naming the settings file.
const CONFIG_ENV: &str = "QRBLOCK_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(&logging::LogConfig::from_env())?;

    info!("Starting qrblock-server");

    let settings = load_settings()?;
    let catalog = load_catalog(&settings)?;
    let bind_address = settings.server.bind_address.clone();

    let state = AppState::new(settings, catalog)?.shared();
    let app = api::create_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Settings from `QRBLOCK_CONFIG`, the platform default file when it exists,
/// or built-in defaults; environment overrides apply in every case.
fn load_settings() -> anyhow::Result<Settings> {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(|| default_settings_path().filter(|path| path.exists()));

    match &path {
        Some(path) => info!(path = %path.display(), "loading settings"),
        None => info!("no settings file, using defaults"),
    }

    Settings::load(path.as_deref()).context("failed to load settings")
}

/// The configured catalog, else the default catalog when present, else an
/// empty catalog.
fn load_catalog(settings: &Settings) -> anyhow::Result<FileCatalog> {
    if let Some(path) = &settings.catalog.path {
        return FileCatalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()));
    }

    match default_catalog_path().filter(|path| path.exists()) {
        Some(path) => Ok(FileCatalog::load(path)?),
        None => {
            warn!("no course catalog configured; course modes will render unavailable");
            Ok(FileCatalog::empty())
        }
    }
}
