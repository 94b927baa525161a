//! Photo Editor Bot - Main Entry Point
//!
//! Loads and validates settings, configures logging from them and serves
//! the HTTP application until Ctrl+C.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use photo_editor_bot::config::{DEFAULT_ENV_FILE, SettingsStore};
use photo_editor_bot::logging;
use photo_editor_bot::server::{self, AppState};

/// Telegram photo editing bot service.
#[derive(Parser, Debug)]
#[command(name = "photo_bot")]
#[command(about = "Photo editing Telegram bot backed by Photoroom")]
#[command(version)]
struct Args {
    /// Path to the .env file with settings.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: String,

    /// Log level used until settings are loaded (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_handle = logging::init(&args.log_level).context("Failed to initialize logging")?;

    let store = Arc::new(SettingsStore::new(&args.env_file));
    let settings = store.get().context("Failed to load settings")?;

    log_handle
        .apply(&settings)
        .context("Failed to configure logging from settings")?;

    info!(
        "Default processor: {} (photoroom: {}, pillow: {})",
        settings.default_processor, settings.enable_photoroom, settings.enable_pillow
    );

    #[cfg(unix)]
    let reload_handle = tokio::spawn(reload::on_hangup(
        Arc::clone(&store),
        log_handle,
        Arc::clone(&settings),
    ));
    #[cfg(not(unix))]
    drop(log_handle);

    let state = AppState::new(settings);

    info!("Starting photo editor bot...");
    server::serve(state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down...");
    })
    .await
    .context("HTTP server failed")?;

    #[cfg(unix)]
    reload_handle.abort();

    Ok(())
}

#[cfg(unix)]
mod reload {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use tokio::signal::unix::{SignalKind, signal};
    use tracing::{info, warn};

    use photo_editor_bot::config::{Settings, SettingsStore};
    use photo_editor_bot::logging::LogHandle;

    /// Reloads settings on every SIGHUP.
    ///
    /// The running server keeps its startup settings; only logging follows
    /// the reloaded values.
    pub async fn on_hangup(
        store: Arc<SettingsStore>,
        log_handle: LogHandle,
        running: Arc<Settings>,
    ) -> Result<()> {
        let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;

        while hangup.recv().await.is_some() {
            info!("Received SIGHUP, reloading settings...");

            let settings = match store.reload() {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Reload failed, keeping current configuration: {}", e);
                    continue;
                }
            };

            if let Err(e) = log_handle.apply(&settings) {
                warn!("Failed to apply reloaded logging settings: {}", e);
            }

            if settings.host != running.host || settings.port != running.port {
                warn!(
                    "Listen address changed ({}:{} -> {}:{}), restart to apply",
                    running.host, running.port, settings.host, settings.port
                );
            }
        }

        Ok(())
    }
}
