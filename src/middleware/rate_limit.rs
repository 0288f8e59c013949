//! Rate limiting middleware using actix-governor.
//!
//! Limits are per client IP. A loose site-wide limiter sits in front of the
//! whole app. The form posts that fan out to the identity service, the backend
//! or Stripe (sign-in, beta signup, checkout) share a much stricter one.

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

/// Type alias for the rate limiter configuration.
pub type RateLimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Type alias for the rate limiter.
pub type RateLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Builds the limiter configuration: one request per `seconds_per_request`,
/// with bursts of up to `burst_size`.
///
/// Returns `None` when either value is zero.
pub fn rate_limiter_config(seconds_per_request: u64, burst_size: u32) -> Option<RateLimiterConfig> {
    GovernorConfigBuilder::default()
        .seconds_per_request(seconds_per_request)
        .burst_size(burst_size)
        .finish()
}

/// Creates the site-wide rate limiter: about 60 requests per minute per IP,
/// with bursts of 60 so a page and its follow-up posts never hit the limit.
pub fn create_rate_limiter() -> RateLimiter {
    // Both values are non-zero, so the builder always succeeds
    let config = rate_limiter_config(1, 60).unwrap_or_default();
    Governor::new(&config)
}

/// Configuration for the form post limiter: one request every 6 seconds per IP,
/// with bursts of 10.
///
/// Build it once and share it between workers so the quota is per IP, not
/// per worker.
pub fn form_rate_limiter_config() -> RateLimiterConfig {
    rate_limiter_config(6, 10).unwrap_or_default()
}
