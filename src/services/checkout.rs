//! Checkout session providers.
//!
//! The pricing page hands the visitor to the payment provider. Sessions are
//! created by the backend by default, or directly with Stripe when a secret
//! key is configured (see [`crate::services::stripe_client::StripeCheckout`]).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::backend::{BackendApi, BackendError, CheckoutRequest, CheckoutSession};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error("No price configured for tier {0}")]
    MissingPrice(String),
}

impl CheckoutError {
    /// Text shown on the pricing page when checkout fails.
    ///
    /// Server supplied error text is passed through; transport failures get a
    /// generic message.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Backend(e) => e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_CHECKOUT_ERROR.to_string()),
            CheckoutError::Provider(message) => message.clone(),
            CheckoutError::MissingPrice(_) => {
                "This plan is not available for online purchase yet".to_string()
            }
        }
    }
}

pub const GENERIC_CHECKOUT_ERROR: &str = "Could not start the checkout. Please try again later.";

#[async_trait]
pub trait CheckoutProvider: Send + Sync + 'static {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, CheckoutError>;
}

/// Delegates checkout creation to the backend.
#[derive(Clone)]
pub struct BackendCheckout {
    backend: Arc<dyn BackendApi>,
}

impl BackendCheckout {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl CheckoutProvider for BackendCheckout {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, CheckoutError> {
        Ok(self.backend.create_checkout_session(request).await?)
    }
}
