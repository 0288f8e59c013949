//! Stripe API client service for direct checkout.
//!
//! This module provides a lightweight wrapper around the Stripe Rust SDK client
//! and the checkout provider built on top of it.

use async_trait::async_trait;
use stripe::{CheckoutSessionMode, Client, CreateCheckoutSession, CreateCheckoutSessionLineItems};

use crate::services::backend::{CheckoutRequest, CheckoutSession};
use crate::services::checkout::{CheckoutError, CheckoutProvider};

/// Stripe client service for managing payment operations
#[derive(Clone)]
pub struct StripeClientService {
    client: Client,
}

impl StripeClientService {
    /// Create a new Stripe client service with the provided API key
    pub fn new(api_key: String) -> Self {
        let client = Client::new(api_key);
        Self { client }
    }

    /// Get a reference to the underlying Stripe client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Creates subscription checkout sessions directly with Stripe.
#[derive(Clone)]
pub struct StripeCheckout {
    stripe: StripeClientService,
}

impl StripeCheckout {
    pub fn new(stripe: StripeClientService) -> Self {
        Self { stripe }
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, CheckoutError> {
        let price_id = request
            .price_id
            .clone()
            .ok_or_else(|| CheckoutError::MissingPrice(request.tier_id.clone()))?;

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.success_url = Some(request.success_url.as_str());
        params.cancel_url = Some(request.cancel_url.as_str());
        params.customer_email = request.customer_email.as_deref();

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(price_id),
            quantity: Some(1),
            ..Default::default()
        }]);

        params.metadata = Some(
            vec![("tier_id".to_string(), request.tier_id.clone())]
                .into_iter()
                .collect(),
        );

        let session = stripe::CheckoutSession::create(self.stripe.client(), params)
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| CheckoutError::Provider("No checkout URL in session".to_string()))?;

        tracing::info!("Created Stripe checkout session {} for tier {}", session.id, request.tier_id);

        Ok(CheckoutSession {
            url,
            session_id: Some(session.id.to_string()),
        })
    }
}
