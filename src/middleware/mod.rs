//! Middleware for the arquinorma-web application.
//!
//! This module contains:
//! - `auth` - session extractors (`CurrentUser`, `StaffUser`, `OptionalUser`)
//! - `rate_limit` - Rate limiting middleware using Governor

pub mod auth;
pub mod rate_limit;

// Re-export commonly used types
pub use auth::{CurrentUser, OptionalUser, StaffUser, SESSION_COOKIE};
pub use rate_limit::{
    create_rate_limiter, form_rate_limiter_config, RateLimiter, RateLimiterConfig,
};
