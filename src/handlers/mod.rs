//! HTTP handlers for the arquinorma-web application.
//!
//! This module contains all the route handlers:
//! - `auth` - Sign-in and sign-out, plus the shared `AppState`
//! - `health` - Health check endpoint
//! - `legal` - Privacy policy, terms and legal notice
//! - `pricing` - Plans, beta signup and checkout
//! - `payment` - Checkout result pages
//! - `admin` - Staff-only document upload and beta user list

pub mod admin;
pub mod auth;
pub mod health;
pub mod legal;
pub mod payment;
pub mod pricing;

use actix_governor::Governor;
use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::middleware::RateLimiterConfig;

// Re-export commonly used types
pub use admin::{beta_users, upload_document, upload_form};
pub use auth::{login, login_page, logout, safe_next, AppState, LoginForm, LoginQuery};
pub use health::{health_check, HealthResponse};
pub use legal::{index, legal_notice, privacy, terms};
pub use payment::{payment_cancel, payment_success};
pub use pricing::{beta_register, checkout, pricing_page, CheckoutForm};

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(
        "The page you are looking for does not exist".to_string(),
    ))
}

/// Registers every route of the site.
///
/// The form posts that call out to other services go through `form_limiter`.
/// Its state lives in the config, so pass the same one to every worker.
/// Site-wide middleware (logging, the loose rate limiter) is wrapped around
/// the app by the caller.
pub fn configure(cfg: &mut web::ServiceConfig, form_limiter: &RateLimiterConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health_check))
        // Public pages
        .route("/", web::get().to(index))
        .route("/privacy", web::get().to(privacy))
        .route("/terms", web::get().to(terms))
        .route("/legal", web::get().to(legal_notice))
        .route("/pricing", web::get().to(pricing_page))
        .route(
            "/beta-register",
            web::post()
                .to(beta_register)
                .wrap(Governor::new(form_limiter)),
        )
        .route(
            "/checkout",
            web::post().to(checkout).wrap(Governor::new(form_limiter)),
        )
        .route("/payment/success", web::get().to(payment_success))
        .route("/payment/cancel", web::get().to(payment_cancel))
        // Session
        .service(
            web::resource("/login")
                .route(web::get().to(login_page))
                .route(web::post().to(login).wrap(Governor::new(form_limiter))),
        )
        .route("/logout", web::post().to(logout))
        // Staff only
        .service(
            web::resource("/admin/upload")
                .route(web::get().to(upload_form))
                .route(web::post().to(upload_document)),
        )
        .route("/admin/beta-users", web::get().to(beta_users))
        .default_service(web::to(not_found));
}
