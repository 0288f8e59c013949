//! Services module - external service clients and page logic.
//!
//! This module contains:
//! - `identity`: identity/session service client and the static test identity
//! - `backend`: REST backend client (beta users, uploads, checkout, beta signup)
//! - `checkout`: checkout session providers
//! - `stripe_client`: direct Stripe checkout
//! - `upload`: multipart parsing and PDF validation
//! - `pricing`: the static pricing catalog

pub mod backend;
pub mod checkout;
pub mod identity;
pub mod pricing;
pub mod stripe_client;
pub mod upload;

// Re-export commonly used types for convenience
pub use backend::{
    BackendApi, BackendError, CheckoutRequest, CheckoutSession, FailureCategory,
    HttpBackendClient, UploadDocument,
};
pub use checkout::{BackendCheckout, CheckoutError, CheckoutProvider};
pub use identity::{
    resolve_user, HttpIdentityClient, IdentityError, IdentityProvider, StaticIdentity,
};
pub use stripe_client::{StripeCheckout, StripeClientService};
pub use upload::{UploadError, UploadForm};
