//! arquinorma-web - Main application entry point
//!
//! Serves the ArquiNorma website: pricing, beta signup, checkout, legal pages,
//! sign-in, and the staff-only admin pages.

use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arquinorma_web::config::Config;
use arquinorma_web::handlers::{self, AppState};
use arquinorma_web::middleware::{create_rate_limiter, form_rate_limiter_config};

/// Timeout for calls to the identity service and the backend.
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arquinorma_web=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Loading configuration...");

    // Load configuration from environment variables
    let config = Config::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let server_addr = config.server_addr();

    tracing::info!(
        "Environment: {}, backend: {}, identity service: {}",
        config.app_env,
        config.backend_url,
        config.identity_url
    );

    // One HTTP client shared by the identity and backend clients
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("arquinorma-web/", env!("CARGO_PKG_VERSION")))
        .timeout(OUTBOUND_TIMEOUT)
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    // Create shared application state
    let app_state = web::Data::new(AppState::from_config(config, http_client));

    // Shared by all workers so the form post quota is per IP
    let form_limiter = form_rate_limiter_config();

    tracing::info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        // Create rate limiter for each worker (Governor doesn't implement Clone)
        let rate_limiter = create_rate_limiter();

        App::new()
            .app_data(app_state.clone())
            // Request logging
            .wrap(Logger::default())
            // Distributed tracing
            .wrap(tracing_actix_web::TracingLogger::default())
            // Rate limiting
            .wrap(rate_limiter)
            .configure(|cfg| handlers::configure(cfg, &form_limiter))
    })
    .bind(&server_addr)?
    .run()
    .await
}
