//! arquinorma-web - public website and staff console for ArquiNorma
//!
//! Serves the pricing page with beta signup and checkout, the legal pages,
//! password sign-in against the identity service, and the staff-only admin
//! pages (document upload, confirmed beta users) that sit in front of the
//! ArquiNorma REST backend.
//!
//! # Modules
//!
//! - [`config`] - Application configuration from environment variables
//! - [`error`] - Unified error handling
//! - [`models`] - Users, roles, beta registrations, pricing tiers, upload stats
//! - [`services`] - Identity, backend and checkout clients; upload validation; pricing
//! - [`views`] - HTML templates and page rendering
//! - [`handlers`] - HTTP route handlers
//! - [`middleware`] - Session extractors and rate limiting
//!
//! # Quick Start
//!
//! ```ignore
//! use arquinorma_web::{AppState, Config};
//!
//! let config = Config::from_env()?;
//! let state = AppState::from_config(config, reqwest::Client::new());
//! let form_limiter = arquinorma_web::middleware::form_rate_limiter_config();
//! let app = actix_web::App::new()
//!     .app_data(actix_web::web::Data::new(state))
//!     .configure(|cfg| arquinorma_web::handlers::configure(cfg, &form_limiter));
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;

// Re-export commonly used types at the crate root
pub use config::{Config, ConfigError};
pub use error::{AppError, AppResult};
pub use handlers::auth::AppState;
pub use models::{BetaRegistration, BetaSignup, PricingTier, Role, SessionUser, UploadStats};
pub use services::{BackendApi, BackendError, CheckoutProvider, IdentityProvider};
