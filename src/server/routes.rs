//! Application factory.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Builds the application router.
///
/// Informational routes are served at the root and again under `/api/v1`,
/// where the index answers both `/api/v1` and `/api/v1/`.
/// Request bodies are capped at the configured image size and requests time
/// out after the configured request timeout.
#[allow(deprecated)]
pub fn create_app(state: AppState) -> Router {
    let settings = &state.settings;

    if settings.is_development() {
        info!("🛠️ Development mode");
    }
    if settings.webhooks_enabled() {
        if let Some(url) = &settings.webhook_url {
            info!("🌐 Webhook URL: {}", url);
        }
    }

    let body_limit = usize::try_from(settings.max_image_size_bytes()).unwrap_or(usize::MAX);
    let timeout = settings.request_timeout();

    let api = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    Router::new()
        .merge(api.clone())
        .route("/api/v1/", get(handlers::root))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
}
