//! Application settings and their validation.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;

use super::source::SettingsSource;
use super::{
    BYTES_PER_MB, PHOTOROOM_API_KEY_PLACEHOLDER, TELEGRAM_BOT_TOKEN_PLACEHOLDER,
    WEBHOOK_URL_PLACEHOLDER_PREFIX,
};

/// Variable names for every settings field.
pub mod keys {
    pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const PHOTOROOM_API_KEY: &str = "PHOTOROOM_API_KEY";
    pub const SECRET_TOKEN: &str = "SECRET_TOKEN";
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
    pub const MAX_IMAGE_SIZE_MB: &str = "MAX_IMAGE_SIZE_MB";
    pub const DEFAULT_IMAGE_QUALITY: &str = "DEFAULT_IMAGE_QUALITY";
    pub const SUPPORTED_FORMATS: &str = "SUPPORTED_FORMATS";
    pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
    pub const SESSION_TTL: &str = "SESSION_TTL";
    pub const RATE_LIMIT_PER_MINUTE: &str = "RATE_LIMIT_PER_MINUTE";
    pub const ENABLE_PHOTOROOM: &str = "ENABLE_PHOTOROOM";
    pub const ENABLE_PILLOW: &str = "ENABLE_PILLOW";
    pub const DEFAULT_PROCESSOR: &str = "DEFAULT_PROCESSOR";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENABLE_FILE_LOGGING: &str = "ENABLE_FILE_LOGGING";
}

const DEFAULT_SECRET_TOKEN: &str = "my_secret_token_123";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_IMAGE_SIZE_MB: u32 = 10;
const DEFAULT_IMAGE_QUALITY: u8 = 85;
const DEFAULT_SUPPORTED_FORMATS: [&str; 3] = ["JPEG", "PNG", "WEBP"];
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 20;

const PORT_RANGE: RangeInclusive<i64> = 1000..=65535;
const MAX_IMAGE_SIZE_MB_RANGE: RangeInclusive<i64> = 1..=50;
const IMAGE_QUALITY_RANGE: RangeInclusive<i64> = 1..=100;
const REQUEST_TIMEOUT_RANGE: RangeInclusive<i64> = 5..=120;
const SESSION_TTL_RANGE: RangeInclusive<i64> = 300..=86_400;
const RATE_LIMIT_RANGE: RangeInclusive<i64> = 1..=1000;

/// Minimum length of a Telegram bot token, in characters.
const MIN_BOT_TOKEN_LENGTH: usize = 30;

/// Hosts and ports that indicate a local development setup.
const DEVELOPMENT_HOSTS: [&str; 2] = ["127.0.0.1", "localhost"];
const DEVELOPMENT_PORTS: [u16; 2] = [8000, 8080];

/// Image processing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Processor {
    /// Remote background removal through the Photoroom API.
    Photoroom,
    /// Local processing.
    Pillow,
}

impl Processor {
    /// Literal used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photoroom => "photoroom",
            Self::Pillow => "pillow",
        }
    }

    /// Variable that toggles this processor.
    #[must_use]
    pub const fn toggle_key(self) -> &'static str {
        match self {
            Self::Photoroom => keys::ENABLE_PHOTOROOM,
            Self::Pillow => keys::ENABLE_PILLOW,
        }
    }
}

impl FromStr for Processor {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photoroom" => Ok(Self::Photoroom),
            "pillow" => Ok(Self::Pillow),
            _ => Err(UnknownVariant::new("processor", s)),
        }
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Literal used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Equivalent `tracing` filter directive.
    ///
    /// `tracing` has no level above error, so `CRITICAL` maps to `error`.
    #[must_use]
    pub const fn as_filter_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(UnknownVariant::new("log level", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal that names none of an enum's variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// A single invalid settings field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} is not configured, check the .env file or environment")]
    Missing { field: &'static str },

    #[error("{field} still holds the example placeholder value, check the .env file")]
    Placeholder { field: &'static str },

    #[error("{field} has an invalid format: {reason}")]
    Malformed { field: &'static str, reason: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be one of {allowed}, got {value:?}")]
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("{processor} is disabled ({toggle}=false) but selected as DEFAULT_PROCESSOR")]
    ProcessorDisabled {
        processor: Processor,
        toggle: &'static str,
    },
}

impl FieldError {
    /// Name of the offending variable.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::Placeholder { field }
            | Self::Malformed { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotAllowed { field, .. } => *field,
            Self::ProcessorDisabled { .. } => keys::DEFAULT_PROCESSOR,
        }
    }
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid settings: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),
}

impl SettingsError {
    /// Field errors carried by this error, if any.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Invalid(errors) => errors,
            Self::EnvFile { .. } => &[],
        }
    }

    /// Checks if the given variable is among the offending fields.
    #[must_use]
    pub fn names_field(&self, field: &str) -> bool {
        self.field_errors().iter().any(|e| e.field() == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validated runtime configuration.
///
/// Instances only exist in a fully valid state; see [`Settings::from_source`].
#[derive(Debug)]
pub struct Settings {
    /// Telegram bot token (`<bot id>:<secret>`).
    pub telegram_bot_token: SecretString,

    /// Photoroom API key.
    pub photoroom_api_key: SecretString,

    /// Token Telegram sends with webhook calls.
    pub secret_token: SecretString,

    /// Address the HTTP server binds to.
    pub host: String,

    /// Port the HTTP server binds to.
    pub port: u16,

    /// Public webhook URL; `None` runs in local (polling) mode.
    pub webhook_url: Option<String>,

    /// Largest accepted image, in megabytes.
    pub max_image_size_mb: u32,

    /// Output quality used when a request does not specify one.
    pub default_image_quality: u8,

    /// Accepted image formats, in preference order, without duplicates.
    pub supported_formats: Vec<String>,

    /// Timeout for outgoing and incoming HTTP requests, in seconds.
    pub request_timeout_secs: u64,

    /// User session lifetime, in seconds.
    pub session_ttl_secs: u64,

    /// Requests allowed per user per minute.
    pub rate_limit_per_minute: u32,

    pub enable_photoroom: bool,
    pub enable_pillow: bool,
    pub default_processor: Processor,
    pub log_level: LogLevel,
    pub enable_file_logging: bool,
}

impl Settings {
    /// Parses and validates settings from a source.
    ///
    /// Every field is checked in declaration order and all failures are
    /// reported together. The default-processor rule only runs once the
    /// processor and both toggles have parsed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] listing every offending field.
    pub fn from_source(source: &SettingsSource) -> Result<Self, SettingsError> {
        let mut errors = Vec::new();

        let telegram_bot_token = check(&mut errors, parse_bot_token(source));
        let photoroom_api_key = check(
            &mut errors,
            parse_required_secret(source, keys::PHOTOROOM_API_KEY, PHOTOROOM_API_KEY_PLACEHOLDER),
        );
        let secret_token = SecretString::from(
            source
                .get(keys::SECRET_TOKEN)
                .unwrap_or(DEFAULT_SECRET_TOKEN)
                .to_owned(),
        );
        let host = source.get(keys::HOST).unwrap_or(DEFAULT_HOST).to_owned();
        let port = check(&mut errors, parse_int(source, keys::PORT, DEFAULT_PORT, PORT_RANGE));
        let webhook_url = parse_webhook_url(source);
        let max_image_size_mb = check(
            &mut errors,
            parse_int(
                source,
                keys::MAX_IMAGE_SIZE_MB,
                DEFAULT_MAX_IMAGE_SIZE_MB,
                MAX_IMAGE_SIZE_MB_RANGE,
            ),
        );
        let default_image_quality = check(
            &mut errors,
            parse_int(
                source,
                keys::DEFAULT_IMAGE_QUALITY,
                DEFAULT_IMAGE_QUALITY,
                IMAGE_QUALITY_RANGE,
            ),
        );
        let supported_formats = check(&mut errors, parse_formats(source));
        let request_timeout_secs = check(
            &mut errors,
            parse_int(
                source,
                keys::REQUEST_TIMEOUT,
                DEFAULT_REQUEST_TIMEOUT_SECS,
                REQUEST_TIMEOUT_RANGE,
            ),
        );
        let session_ttl_secs = check(
            &mut errors,
            parse_int(
                source,
                keys::SESSION_TTL,
                DEFAULT_SESSION_TTL_SECS,
                SESSION_TTL_RANGE,
            ),
        );
        let rate_limit_per_minute = check(
            &mut errors,
            parse_int(
                source,
                keys::RATE_LIMIT_PER_MINUTE,
                DEFAULT_RATE_LIMIT_PER_MINUTE,
                RATE_LIMIT_RANGE,
            ),
        );
        let enable_photoroom = check(&mut errors, parse_bool(source, keys::ENABLE_PHOTOROOM, true));
        let enable_pillow = check(&mut errors, parse_bool(source, keys::ENABLE_PILLOW, true));
        let default_processor = check(
            &mut errors,
            parse_choice(
                source,
                keys::DEFAULT_PROCESSOR,
                Processor::Photoroom,
                "photoroom, pillow",
            ),
        );
        let log_level = check(
            &mut errors,
            parse_choice(
                source,
                keys::LOG_LEVEL,
                LogLevel::Info,
                "DEBUG, INFO, WARNING, ERROR, CRITICAL",
            ),
        );
        let enable_file_logging =
            check(&mut errors, parse_bool(source, keys::ENABLE_FILE_LOGGING, true));

        if let (Some(processor), Some(photoroom), Some(pillow)) =
            (default_processor, enable_photoroom, enable_pillow)
        {
            check(&mut errors, check_processor_enabled(processor, photoroom, pillow));
        }

        if !errors.is_empty() {
            return Err(SettingsError::Invalid(errors));
        }

        let (
            Some(telegram_bot_token),
            Some(photoroom_api_key),
            Some(port),
            Some(max_image_size_mb),
            Some(default_image_quality),
            Some(supported_formats),
            Some(request_timeout_secs),
            Some(session_ttl_secs),
            Some(rate_limit_per_minute),
            Some(enable_photoroom),
            Some(enable_pillow),
            Some(default_processor),
            Some(log_level),
            Some(enable_file_logging),
        ) = (
            telegram_bot_token,
            photoroom_api_key,
            port,
            max_image_size_mb,
            default_image_quality,
            supported_formats,
            request_timeout_secs,
            session_ttl_secs,
            rate_limit_per_minute,
            enable_photoroom,
            enable_pillow,
            default_processor,
            log_level,
            enable_file_logging,
        ) else {
            return Err(SettingsError::Invalid(errors));
        };

        Ok(Self {
            telegram_bot_token,
            photoroom_api_key,
            secret_token,
            host,
            port,
            webhook_url,
            max_image_size_mb,
            default_image_quality,
            supported_formats,
            request_timeout_secs,
            session_ttl_secs,
            rate_limit_per_minute,
            enable_photoroom,
            enable_pillow,
            default_processor,
            log_level,
            enable_file_logging,
        })
    }

    /// True for a local setup: loopback host or a common local port.
    #[must_use]
    pub fn is_development(&self) -> bool {
        DEVELOPMENT_HOSTS.contains(&self.host.as_str()) || DEVELOPMENT_PORTS.contains(&self.port)
    }

    /// True when a webhook URL is configured outside development mode.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.webhook_url.is_some() && !self.is_development()
    }

    /// Maximum image size in bytes.
    #[must_use]
    pub fn max_image_size_bytes(&self) -> u64 {
        u64::from(self.max_image_size_mb) * BYTES_PER_MB
    }

    /// True when Telegram should deliver updates via webhook.
    #[must_use]
    pub fn webhooks_enabled(&self) -> bool {
        self.webhook_url.is_some() && self.is_production()
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Checks if a processor can be used.
    #[must_use]
    pub const fn processor_enabled(&self, processor: Processor) -> bool {
        match processor {
            Processor::Photoroom => self.enable_photoroom,
            Processor::Pillow => self.enable_pillow,
        }
    }

    /// Human-readable load summary, without secret values.
    #[must_use]
    pub fn summary(&self) -> SettingsSummary<'_> {
        SettingsSummary { settings: self }
    }
}

/// Display adapter produced by [`Settings::summary`].
pub struct SettingsSummary<'a> {
    settings: &'a Settings,
}

impl fmt::Display for SettingsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.settings;
        writeln!(f, "🌐 Host: {}", s.host)?;
        writeln!(f, "🚪 Port: {}", s.port)?;
        writeln!(
            f,
            "🤖 Telegram Bot: {}",
            configured(s.telegram_bot_token.expose_secret())
        )?;
        writeln!(
            f,
            "🎨 Photoroom API: {}",
            configured(s.photoroom_api_key.expose_secret())
        )?;
        match &s.webhook_url {
            Some(url) => write!(f, "🌐 Webhook: ✅ {url}"),
            None => write!(f, "🌐 Webhook: ❌ local mode"),
        }
    }
}

fn configured(secret: &str) -> &'static str {
    if secret.is_empty() { "❌ missing" } else { "✅ configured" }
}

/// Records a field result, returning the value on success.
fn check<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

fn parse_bot_token(source: &SettingsSource) -> Result<SecretString, FieldError> {
    let field = keys::TELEGRAM_BOT_TOKEN;
    let token = parse_required_secret(source, field, TELEGRAM_BOT_TOKEN_PLACEHOLDER)?;

    let value = token.expose_secret();
    if !value.contains(':') || value.chars().count() < MIN_BOT_TOKEN_LENGTH {
        return Err(FieldError::Malformed {
            field,
            reason: format!(
                "expected '<bot id>:<secret>' of at least {MIN_BOT_TOKEN_LENGTH} characters"
            ),
        });
    }

    Ok(token)
}

fn parse_required_secret(
    source: &SettingsSource,
    field: &'static str,
    placeholder: &str,
) -> Result<SecretString, FieldError> {
    match source.get(field) {
        None => Err(FieldError::Missing { field }),
        Some(value) if value == placeholder => Err(FieldError::Placeholder { field }),
        Some(value) => Ok(SecretString::from(value.to_owned())),
    }
}

fn parse_int<T>(
    source: &SettingsSource,
    field: &'static str,
    default: T,
    range: RangeInclusive<i64>,
) -> Result<T, FieldError>
where
    T: TryFrom<i64>,
{
    let Some(raw) = source.get(field) else {
        return Ok(default);
    };

    let value: i64 = raw.trim().parse().map_err(|_| FieldError::Malformed {
        field,
        reason: format!("{raw:?} is not an integer"),
    })?;

    if !range.contains(&value) {
        return Err(FieldError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }

    T::try_from(value).map_err(|_| FieldError::OutOfRange {
        field,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}

fn parse_bool(source: &SettingsSource, field: &'static str, default: bool) -> Result<bool, FieldError> {
    let Some(raw) = source.get(field) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(FieldError::Malformed {
            field,
            reason: format!("{raw:?} is not a boolean"),
        }),
    }
}

fn parse_choice<T: FromStr>(
    source: &SettingsSource,
    field: &'static str,
    default: T,
    allowed: &'static str,
) -> Result<T, FieldError> {
    match source.get(field) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| FieldError::NotAllowed {
            field,
            value: raw.to_owned(),
            allowed,
        }),
    }
}

fn parse_formats(source: &SettingsSource) -> Result<Vec<String>, FieldError> {
    let field = keys::SUPPORTED_FORMATS;
    let Some(raw) = source.get(field) else {
        return Ok(DEFAULT_SUPPORTED_FORMATS.into_iter().map(str::to_owned).collect());
    };

    let raw = raw.trim();
    let items: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw).map_err(|e| FieldError::Malformed {
            field,
            reason: format!("expected a JSON array of strings: {e}"),
        })?
    } else {
        raw.split(',').map(str::to_owned).collect()
    };

    let mut formats: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !formats.iter().any(|f| f == item) {
            formats.push(item.to_owned());
        }
    }

    Ok(formats)
}

fn parse_webhook_url(source: &SettingsSource) -> Option<String> {
    let url = source.get(keys::WEBHOOK_URL)?;
    if url.starts_with(WEBHOOK_URL_PLACEHOLDER_PREFIX) {
        debug!("Ignoring example webhook URL {}", url);
        return None;
    }
    Some(url.to_owned())
}

fn check_processor_enabled(
    processor: Processor,
    enable_photoroom: bool,
    enable_pillow: bool,
) -> Result<(), FieldError> {
    let enabled = match processor {
        Processor::Photoroom => enable_photoroom,
        Processor::Pillow => enable_pillow,
    };

    if enabled {
        Ok(())
    } else {
        Err(FieldError::ProcessorDisabled {
            processor,
            toggle: processor.toggle_key(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "1234567890:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghi";
    const API_KEY: &str = "photoroom_apikey_1234567890abcdef";

    fn valid_source() -> SettingsSource {
        SettingsSource::from_pairs([
            (keys::TELEGRAM_BOT_TOKEN, TOKEN),
            (keys::PHOTOROOM_API_KEY, API_KEY),
        ])
    }

    fn load_with(pairs: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let mut source = valid_source();
        for (key, value) in pairs {
            source.set(key, *value);
        }
        Settings::from_source(&source)
    }

    #[test]
    fn test_choice_literals_are_exact() {
        assert_eq!("pillow".parse::<Processor>(), Ok(Processor::Pillow));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warning));

        let err = "Pillow".parse::<Processor>().unwrap_err();
        assert_eq!(err.to_string(), "unknown processor \"Pillow\"");
        assert!("warning".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_source(&valid_source()).unwrap();

        assert_eq!(settings.telegram_bot_token.expose_secret(), TOKEN);
        assert_eq!(settings.photoroom_api_key.expose_secret(), API_KEY);
        assert_eq!(settings.secret_token.expose_secret(), "my_secret_token_123");
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.webhook_url, None);
        assert_eq!(settings.max_image_size_mb, 10);
        assert_eq!(settings.default_image_quality, 85);
        assert_eq!(settings.supported_formats, vec!["JPEG", "PNG", "WEBP"]);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.session_ttl_secs, 3600);
        assert_eq!(settings.rate_limit_per_minute, 20);
        assert!(settings.enable_photoroom);
        assert!(settings.enable_pillow);
        assert_eq!(settings.default_processor, Processor::Photoroom);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert!(settings.enable_file_logging);
    }

    #[test]
    fn test_explicit_values_round_trip() {
        let settings = load_with(&[
            ("SECRET_TOKEN", "another_secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "65535"),
            ("WEBHOOK_URL", "https://bot.example.org/hook"),
            ("MAX_IMAGE_SIZE_MB", "50"),
            ("DEFAULT_IMAGE_QUALITY", "1"),
            ("SUPPORTED_FORMATS", r#"["PNG", "JPEG"]"#),
            ("REQUEST_TIMEOUT", "120"),
            ("SESSION_TTL", "300"),
            ("RATE_LIMIT_PER_MINUTE", "1000"),
            ("ENABLE_PHOTOROOM", "false"),
            ("ENABLE_PILLOW", "true"),
            ("DEFAULT_PROCESSOR", "pillow"),
            ("LOG_LEVEL", "WARNING"),
            ("ENABLE_FILE_LOGGING", "0"),
        ])
        .unwrap();

        assert_eq!(settings.secret_token.expose_secret(), "another_secret");
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 65535);
        assert_eq!(settings.webhook_url.as_deref(), Some("https://bot.example.org/hook"));
        assert_eq!(settings.max_image_size_mb, 50);
        assert_eq!(settings.default_image_quality, 1);
        assert_eq!(settings.supported_formats, vec!["PNG", "JPEG"]);
        assert_eq!(settings.request_timeout_secs, 120);
        assert_eq!(settings.session_ttl_secs, 300);
        assert_eq!(settings.rate_limit_per_minute, 1000);
        assert!(!settings.enable_photoroom);
        assert!(settings.enable_pillow);
        assert!(!settings.processor_enabled(Processor::Photoroom));
        assert!(settings.processor_enabled(Processor::Pillow));
        assert_eq!(settings.default_processor, Processor::Pillow);
        assert_eq!(settings.log_level, LogLevel::Warning);
        assert!(!settings.enable_file_logging);
    }

    #[test]
    fn test_numeric_bounds() {
        let cases = [
            (keys::PORT, "999", "65536"),
            (keys::MAX_IMAGE_SIZE_MB, "0", "51"),
            (keys::DEFAULT_IMAGE_QUALITY, "0", "101"),
            (keys::REQUEST_TIMEOUT, "4", "121"),
            (keys::SESSION_TTL, "299", "86401"),
            (keys::RATE_LIMIT_PER_MINUTE, "0", "1001"),
        ];

        for (field, below, above) in cases {
            for value in [below, above] {
                let err = load_with(&[(field, value)]).unwrap_err();
                assert!(err.names_field(field), "{field}={value} should fail: {err}");
                assert_eq!(err.field_errors().len(), 1);
            }
        }
    }

    #[test]
    fn test_negative_number_is_out_of_range() {
        let err = load_with(&[("PORT", "-1")]).unwrap_err();
        assert!(matches!(
            err.field_errors(),
            [FieldError::OutOfRange { field: "PORT", value: -1, .. }]
        ));
    }

    #[test]
    fn test_non_numeric_value_is_malformed() {
        let err = load_with(&[("SESSION_TTL", "an hour")]).unwrap_err();
        assert!(matches!(
            err.field_errors(),
            [FieldError::Malformed { field: "SESSION_TTL", .. }]
        ));
    }

    #[test]
    fn test_missing_bot_token() {
        let mut source = valid_source();
        source.remove(keys::TELEGRAM_BOT_TOKEN);
        let err = Settings::from_source(&source).unwrap_err();
        assert!(matches!(
            err.field_errors(),
            [FieldError::Missing { field: "TELEGRAM_BOT_TOKEN" }]
        ));
    }

    #[test]
    fn test_missing_api_key() {
        let mut source = valid_source();
        source.remove(keys::PHOTOROOM_API_KEY);
        let err = Settings::from_source(&source).unwrap_err();
        assert!(err.names_field(keys::PHOTOROOM_API_KEY));
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let err = load_with(&[("PHOTOROOM_API_KEY", "")]).unwrap_err();
        assert!(matches!(
            err.field_errors(),
            [FieldError::Missing { field: "PHOTOROOM_API_KEY" }]
        ));
    }

    #[test]
    fn test_placeholder_secrets_rejected() {
        let err = load_with(&[
            ("TELEGRAM_BOT_TOKEN", "your_telegram_bot_token_here"),
            ("PHOTOROOM_API_KEY", "your_photoroom_api_key_here"),
        ])
        .unwrap_err();

        assert_eq!(
            err.field_errors(),
            &[
                FieldError::Placeholder { field: "TELEGRAM_BOT_TOKEN" },
                FieldError::Placeholder { field: "PHOTOROOM_API_KEY" },
            ]
        );
    }

    #[test]
    fn test_bot_token_format() {
        // No separator
        let err = load_with(&[("TELEGRAM_BOT_TOKEN", "1234567890ABCDEFGHIJKLMNOPQRSTUVWXYZ")])
            .unwrap_err();
        assert!(err.names_field(keys::TELEGRAM_BOT_TOKEN));

        // Too short
        let err = load_with(&[("TELEGRAM_BOT_TOKEN", "123:abc")]).unwrap_err();
        assert!(err.names_field(keys::TELEGRAM_BOT_TOKEN));

        // Exactly 30 characters is accepted
        let token = format!("123456789:{}", "a".repeat(20));
        assert_eq!(token.len(), 30);
        assert!(load_with(&[("TELEGRAM_BOT_TOKEN", token.as_str())]).is_ok());
    }

    #[test]
    fn test_missing_secret_fails_even_with_other_fields_valid() {
        let source = SettingsSource::from_pairs([
            (keys::PHOTOROOM_API_KEY, API_KEY),
            (keys::PORT, "9000"),
            (keys::HOST, "0.0.0.0"),
        ]);
        assert!(Settings::from_source(&source).is_err());
    }

    #[test]
    fn test_all_field_errors_are_reported() {
        let err = load_with(&[
            ("PORT", "1"),
            ("LOG_LEVEL", "verbose"),
            ("ENABLE_PILLOW", "maybe"),
        ])
        .unwrap_err();

        let fields: Vec<_> = err.field_errors().iter().map(FieldError::field).collect();
        assert_eq!(fields, vec!["PORT", "ENABLE_PILLOW", "LOG_LEVEL"]);
    }

    #[test]
    fn test_enum_literals_are_case_sensitive() {
        let err = load_with(&[("LOG_LEVEL", "info")]).unwrap_err();
        assert!(err.names_field(keys::LOG_LEVEL));

        let err = load_with(&[("DEFAULT_PROCESSOR", "Photoroom")]).unwrap_err();
        assert!(err.names_field(keys::DEFAULT_PROCESSOR));

        let settings = load_with(&[("LOG_LEVEL", "CRITICAL")]).unwrap();
        assert_eq!(settings.log_level, LogLevel::Critical);
    }

    #[test]
    fn test_default_processor_requires_its_toggle() {
        let err = load_with(&[("ENABLE_PHOTOROOM", "false")]).unwrap_err();
        assert_eq!(
            err.field_errors(),
            &[FieldError::ProcessorDisabled {
                processor: Processor::Photoroom,
                toggle: keys::ENABLE_PHOTOROOM,
            }]
        );
        assert!(err.names_field(keys::DEFAULT_PROCESSOR));

        let err = load_with(&[("DEFAULT_PROCESSOR", "pillow"), ("ENABLE_PILLOW", "no")])
            .unwrap_err();
        assert!(err.names_field(keys::DEFAULT_PROCESSOR));

        assert!(load_with(&[("DEFAULT_PROCESSOR", "pillow"), ("ENABLE_PHOTOROOM", "off")]).is_ok());
        assert!(load_with(&[("DEFAULT_PROCESSOR", "photoroom"), ("ENABLE_PILLOW", "false")]).is_ok());
    }

    #[test]
    fn test_cross_field_rule_skipped_when_toggle_invalid() {
        let err = load_with(&[("ENABLE_PHOTOROOM", "nope")]).unwrap_err();
        assert!(matches!(
            err.field_errors(),
            [FieldError::Malformed { field: "ENABLE_PHOTOROOM", .. }]
        ));
    }

    #[test]
    fn test_placeholder_webhook_is_absent() {
        let settings = load_with(&[("WEBHOOK_URL", "https://yourdomain.example")]).unwrap();
        assert_eq!(settings.webhook_url, None);

        let settings = load_with(&[("WEBHOOK_URL", "https://yourdomain.com/webhook")]).unwrap();
        assert_eq!(settings.webhook_url, None);

        let settings = load_with(&[("WEBHOOK_URL", "https://mydomain.example")]).unwrap();
        assert_eq!(settings.webhook_url.as_deref(), Some("https://mydomain.example"));
    }

    #[test]
    fn test_supported_formats_parsing() {
        let settings = load_with(&[("SUPPORTED_FORMATS", "PNG, WEBP,PNG , GIF")]).unwrap();
        assert_eq!(settings.supported_formats, vec!["PNG", "WEBP", "GIF"]);

        let settings = load_with(&[("SUPPORTED_FORMATS", "[]")]).unwrap();
        assert!(settings.supported_formats.is_empty());

        let err = load_with(&[("SUPPORTED_FORMATS", "[PNG")]).unwrap_err();
        assert!(err.names_field(keys::SUPPORTED_FORMATS));
    }

    #[test]
    fn test_max_image_size_bytes() {
        let settings = load_with(&[("MAX_IMAGE_SIZE_MB", "10")]).unwrap();
        assert_eq!(settings.max_image_size_bytes(), 10_485_760);

        let settings = load_with(&[("MAX_IMAGE_SIZE_MB", "1")]).unwrap();
        assert_eq!(settings.max_image_size_bytes(), 1_048_576);

        let settings = load_with(&[("MAX_IMAGE_SIZE_MB", "50")]).unwrap();
        assert_eq!(settings.max_image_size_bytes(), 52_428_800);
    }

    #[test]
    fn test_development_mode() {
        let settings = load_with(&[("HOST", "127.0.0.1"), ("PORT", "9000")]).unwrap();
        assert!(settings.is_development());

        let settings = load_with(&[("HOST", "localhost"), ("PORT", "9000")]).unwrap();
        assert!(settings.is_development());

        let settings = load_with(&[("HOST", "0.0.0.0"), ("PORT", "8080")]).unwrap();
        assert!(settings.is_development());

        let settings = load_with(&[("HOST", "0.0.0.0"), ("PORT", "9000")]).unwrap();
        assert!(!settings.is_development());
        assert!(!settings.is_production());
        assert!(!settings.webhooks_enabled());
    }

    #[test]
    fn test_production_mode_requires_webhook_outside_development() {
        let settings = load_with(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("WEBHOOK_URL", "https://bot.example.org"),
        ])
        .unwrap();
        assert!(settings.is_production());
        assert!(settings.webhooks_enabled());

        let settings = load_with(&[("PORT", "9000"), ("WEBHOOK_URL", "https://bot.example.org")])
            .unwrap();
        assert!(settings.is_development());
        assert!(!settings.is_production());
        assert!(!settings.webhooks_enabled());
    }

    #[test]
    fn test_durations() {
        let settings = load_with(&[("REQUEST_TIMEOUT", "45"), ("SESSION_TTL", "600")]).unwrap();
        assert_eq!(settings.request_timeout(), Duration::from_secs(45));
        assert_eq!(settings.session_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_log_level_filter_directive() {
        assert_eq!(LogLevel::Debug.as_filter_directive(), "debug");
        assert_eq!(LogLevel::Warning.as_filter_directive(), "warn");
        assert_eq!(LogLevel::Critical.as_filter_directive(), "error");
    }

    #[test]
    fn test_summary_hides_secrets() {
        let settings = load_with(&[("WEBHOOK_URL", "https://bot.example.org")]).unwrap();
        let summary = settings.summary().to_string();

        assert!(summary.contains("Host: 127.0.0.1"));
        assert!(summary.contains("Port: 8000"));
        assert!(summary.contains("Webhook: ✅ https://bot.example.org"));
        assert!(!summary.contains(TOKEN));
        assert!(!summary.contains(API_KEY));

        let debug = format!("{settings:?}");
        assert!(!debug.contains(TOKEN));
        assert!(!debug.contains(API_KEY));
    }
}
