//! Standalone validator for bot settings.
//!
//! Loads an env file the same way the service does and reports every
//! invalid variable, so configuration problems can be fixed before deploy.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use secrecy::ExposeSecret;

use photo_editor_bot::config::{DEFAULT_ENV_FILE, Settings, SettingsSource};

/// Settings validator.
#[derive(Parser, Debug)]
#[command(name = "validate_settings")]
#[command(about = "Validates environment settings for the photo editor bot")]
#[command(version)]
struct Args {
    /// Path to the env file to validate.
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    file: String,

    /// Ignore the process environment and read only the env file.
    #[arg(long)]
    isolated: bool,

    /// Show every effective value (secrets are masked).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    println!("Validating: {}", args.file);
    println!(
        "Sources: {}\n",
        if args.isolated { "env file only" } else { "environment + env file" }
    );

    if !Path::new(&args.file).exists() {
        println!("⚠ {} not found, checking the environment only\n", args.file);
    }

    let base = if args.isolated {
        SettingsSource::new()
    } else {
        SettingsSource::from_process_env()
    };

    let source = match base.with_env_file(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    match Settings::from_source(&source) {
        Ok(settings) => {
            println!("✓ Settings are valid!\n");
            println!("{}", settings.summary());

            if args.verbose {
                print_details(&settings);
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            let errors = e.field_errors();
            if errors.is_empty() {
                eprintln!("✗ {e}");
            }
            for error in errors {
                println!("  ✗ {}: {error}", error.field());
            }

            println!("\n✗ Validation failed: {} error(s)", errors.len());
            ExitCode::FAILURE
        }
    }
}

fn print_details(settings: &Settings) {
    println!("\nEffective values:");
    println!("  TELEGRAM_BOT_TOKEN     {}", mask(settings.telegram_bot_token.expose_secret()));
    println!("  PHOTOROOM_API_KEY      {}", mask(settings.photoroom_api_key.expose_secret()));
    println!("  SECRET_TOKEN           {}", mask(settings.secret_token.expose_secret()));
    println!("  HOST                   {}", settings.host);
    println!("  PORT                   {}", settings.port);
    println!(
        "  WEBHOOK_URL            {}",
        settings.webhook_url.as_deref().unwrap_or("(none)")
    );
    println!(
        "  MAX_IMAGE_SIZE_MB      {} ({} bytes)",
        settings.max_image_size_mb,
        settings.max_image_size_bytes()
    );
    println!("  DEFAULT_IMAGE_QUALITY  {}", settings.default_image_quality);
    println!("  SUPPORTED_FORMATS      {}", settings.supported_formats.join(", "));
    println!("  REQUEST_TIMEOUT        {}s", settings.request_timeout_secs);
    println!("  SESSION_TTL            {}s", settings.session_ttl_secs);
    println!("  RATE_LIMIT_PER_MINUTE  {}", settings.rate_limit_per_minute);
    println!("  ENABLE_PHOTOROOM       {}", settings.enable_photoroom);
    println!("  ENABLE_PILLOW          {}", settings.enable_pillow);
    println!("  DEFAULT_PROCESSOR      {}", settings.default_processor);
    println!("  LOG_LEVEL              {}", settings.log_level);
    println!("  ENABLE_FILE_LOGGING    {}", settings.enable_file_logging);

    println!("\nMode:");
    println!("  development: {}", settings.is_development());
    println!("  production:  {}", settings.is_production());
    println!("  webhooks:    {}", settings.webhooks_enabled());
}

/// Shows only the first few characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…")
}
