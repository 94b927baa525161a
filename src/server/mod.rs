//! HTTP surface of the bot service.
//!
//! Serves the informational endpoints. Telegram update handling is not
//! part of this crate.

mod handlers;
mod routes;
mod state;

pub use handlers::{health, root, HealthResponse, RootResponse};
pub use routes::create_app;
pub use state::AppState;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

/// Binds to the configured host and port and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve<F>(state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener =
        TcpListener::bind((state.settings.host.as_str(), state.settings.port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
