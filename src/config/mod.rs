//! Configuration module for the photo editor bot.
//!
//! Handles loading settings from the environment and dotenv files,
//! validating them, and caching the result for the rest of the service.

mod settings;
mod source;
mod store;

pub use settings::{
    keys, FieldError, LogLevel, Processor, Settings, SettingsError, SettingsSummary,
    UnknownVariant,
};
pub use source::SettingsSource;
pub use store::{load_settings_from, load_test_settings, SettingsStore};

/// Env file read during local development.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Env file read by [`load_test_settings`].
pub const TEST_ENV_FILE: &str = ".env.test";

/// Example bot token shipped in `.env.example`.
pub const TELEGRAM_BOT_TOKEN_PLACEHOLDER: &str = "your_telegram_bot_token_here";

/// Example Photoroom key shipped in `.env.example`.
pub const PHOTOROOM_API_KEY_PLACEHOLDER: &str = "your_photoroom_api_key_here";

/// Webhook URLs starting with this prefix are treated as unset.
pub const WEBHOOK_URL_PLACEHOLDER_PREFIX: &str = "https://yourdomain";

pub const BYTES_PER_MB: u64 = 1024 * 1024;
