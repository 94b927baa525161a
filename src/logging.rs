//! Logging setup driven by the loaded settings.
//!
//! Logging starts with a bootstrap level so settings loading itself is
//! visible, then [`LogHandle::apply`] switches to the configured level and
//! attaches the rotating log file when enabled.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, reload};

use crate::config::Settings;

/// Directory that holds rotated log files.
pub const LOG_DIR: &str = "logs";

/// Prefix of rotated log files (`photo_bot.YYYY-MM-DD.log`).
const LOG_FILE_PREFIX: &str = "photo_bot";

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type FileLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Logging errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file: {0}")]
    Appender(#[from] InitError),

    #[error("Failed to update logging configuration: {0}")]
    Reload(#[from] reload::Error),

    #[error("Logging is already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Handle for reconfiguring the installed subscriber.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    file: reload::Handle<Option<FileLayer>, FilteredRegistry>,
    log_dir: PathBuf,
}

/// Installs the global subscriber with console output at `default_level`.
///
/// `RUST_LOG` overrides the level when set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(default_level: &str) -> Result<LogHandle, LoggingError> {
    let (filter, filter_handle) = reload::Layer::new(build_filter(default_level));
    let (file, file_handle) = reload::Layer::new(None::<FileLayer>);

    tracing_subscriber::registry()
        .with(filter)
        .with(file)
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(LogHandle {
        filter: filter_handle,
        file: file_handle,
        log_dir: PathBuf::from(LOG_DIR),
    })
}

impl LogHandle {
    /// Applies the log level and file logging toggle from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened or the subscriber
    /// rejects the new configuration.
    pub fn apply(&self, settings: &Settings) -> Result<(), LoggingError> {
        self.filter
            .reload(build_filter(settings.log_level.as_filter_directive()))?;

        let file_layer = if settings.enable_file_logging {
            let appender = open_log_file(&self.log_dir)?;
            let layer: FileLayer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(appender)
                .boxed();
            Some(layer)
        } else {
            None
        };

        let file_enabled = file_layer.is_some();
        self.file.reload(file_layer)?;

        debug!(
            "Logging configured (level: {}, file: {})",
            settings.log_level,
            if file_enabled { self.log_dir.display().to_string() } else { "off".to_owned() }
        );
        Ok(())
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Opens the daily-rotating log file, creating the directory if needed.
fn open_log_file(dir: &Path) -> Result<RollingFileAppender, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)?;

    Ok(appender)
}
