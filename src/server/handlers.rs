//! Informational endpoints.

use axum::Json;
use axum::http::StatusCode;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Local time in ISO-8601, see [`format_timestamp`].
    pub timestamp: String,
}

/// Root endpoint confirming the API is up.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "🤖 Photo Editor Bot API is running!".to_owned(),
        status: "success".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_owned(),
            message: "✅ Service is running".to_owned(),
            timestamp: format_timestamp(Local::now().naive_local()),
        }),
    )
}

/// Formats a local time as ISO-8601 without an offset.
///
/// Microseconds are printed with six digits and dropped entirely when zero.
fn format_timestamp(time: NaiveDateTime) -> String {
    if time.nanosecond() / 1_000 == 0 {
        time.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        time.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
