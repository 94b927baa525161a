//! Cached settings with explicit reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{error, info};

use super::{Settings, SettingsError, SettingsSource};

type SourceProvider = Box<dyn Fn() -> Result<SettingsSource, SettingsError> + Send + Sync>;

/// Owner of the process settings.
///
/// Settings are built on the first [`get`](Self::get) and reused until
/// [`invalidate`](Self::invalidate) or [`reload`](Self::reload). A failed
/// build caches nothing, so the next call tries again.
pub struct SettingsStore {
    provider: SourceProvider,
    current: ArcSwapOption<Settings>,
}

impl SettingsStore {
    /// Creates a store reading the process environment plus `env_file`.
    #[must_use]
    pub fn new(env_file: impl Into<PathBuf>) -> Self {
        let env_file = env_file.into();
        Self::with_source(move || SettingsSource::from_process_env().with_env_file(&env_file))
    }

    /// Creates a store backed by a custom source provider.
    ///
    /// The provider is called on every build, so it sees changes made between
    /// reloads.
    pub fn with_source<F>(provider: F) -> Self
    where
        F: Fn() -> Result<SettingsSource, SettingsError> + Send + Sync + 'static,
    {
        Self {
            provider: Box::new(provider),
            current: ArcSwapOption::empty(),
        }
    }

    /// Returns the cached settings, building them on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or validation fails.
    pub fn get(&self) -> Result<Arc<Settings>, SettingsError> {
        if let Some(settings) = self.current.load_full() {
            return Ok(settings);
        }

        let settings = Arc::new(self.build()?);
        self.current.store(Some(Arc::clone(&settings)));
        Ok(settings)
    }

    /// Discards the cached settings and builds them again.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get). On failure the store stays unloaded.
    pub fn reload(&self) -> Result<Arc<Settings>, SettingsError> {
        self.invalidate();
        self.get()
    }

    /// Discards the cached settings without rebuilding.
    pub fn invalidate(&self) {
        self.current.store(None);
    }

    /// Checks if settings are currently cached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    fn build(&self) -> Result<Settings, SettingsError> {
        let result = (self.provider)().and_then(|source| Settings::from_source(&source));

        match &result {
            Ok(settings) => {
                info!("✅ Settings loaded\n{}", settings.summary());
            }
            Err(e) => {
                error!("❌ Failed to load settings: {}", e);
                error!("📋 Check the .env file or environment variables");
            }
        }

        result
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

/// Builds fresh settings from the process environment plus `env_file`.
///
/// Bypasses any [`SettingsStore`]; every call re-reads and re-validates.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validation fails.
pub fn load_settings_from(env_file: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let source = SettingsSource::from_process_env().with_env_file(env_file)?;
    Settings::from_source(&source)
}

/// Builds fresh settings for test runs from `.env.test`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validation fails.
pub fn load_test_settings() -> Result<Settings, SettingsError> {
    load_settings_from(super::TEST_ENV_FILE)
}
