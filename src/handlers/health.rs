//! Liveness check for the ArquiNorma website.
//!
//! `GET /health` answers from this process alone. The identity service, the
//! REST backend and Stripe are never contacted, so load balancers keep
//! routing to the site while those are degraded and the pricing and legal
//! pages stay up.

use actix_web::{HttpResponse, Responder};
use serde::Serialize;

/// Reported in the payload. The REST backend serves its own `/health`.
pub const SERVICE_NAME: &str = "arquinorma-web";

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Crate version of the running binary
    pub version: &'static str,
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
