//! Photo Editor Bot Library
//!
//! Service shell for a Telegram photo editing bot backed by the Photoroom
//! API and a local image processor.
//!
//! This crate provides:
//! - Loading and validating settings from the environment and `.env` files
//! - Caching settings with explicit reload
//! - Logging configured from those settings
//! - The HTTP application with informational endpoints

pub mod config;
pub mod logging;
pub mod server;
