//! Standalone REST API server binary.
//!
//! Serves the recommendation engine over HTTP with OpenAPI/Swagger UI.
//! The engine itself is pure and stateless, so requests need no shared
//! state and may be handled concurrently without coordination.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the esoplan REST API server.
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000).
///
/// # Environment Variables
/// - `ESOPLAN_REST_ADDR`: Server address (default: "0.0.0.0:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("ESOPLAN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting esoplan REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::router()).await?;

    Ok(())
}
