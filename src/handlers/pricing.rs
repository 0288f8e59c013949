//! Pricing page, beta signup and checkout handlers.
//!
//! This module provides the following endpoints:
//! - `GET /pricing` - Plans and the beta signup form
//! - `POST /beta-register` - Beta programme signup, forwarded to the backend
//! - `POST /checkout` - Starts a checkout session for a paid plan

use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::AppState;
use crate::middleware::OptionalUser;
use crate::models::BetaSignup;
use crate::services::pricing::{self, FREE_TIER};
use crate::services::{BackendError, CheckoutRequest};
use crate::views::{self, pages, pages::PricingView, Flash};

pub const BETA_REGISTERED: &str =
    "Registration received. We will email you as soon as your beta access is ready.";

pub const BETA_REGISTER_FAILED: &str = "We could not register you right now. Please try again later.";

/// Form data of the checkout buttons.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub tier_id: String,
}

fn render_pricing(
    state: &AppState,
    current: &OptionalUser,
    status: StatusCode,
    checkout_flash: Option<Flash>,
    beta_flash: Option<Flash>,
    beta_form: &BetaSignup,
) -> HttpResponse {
    let tiers = pricing::catalog(&state.config);
    let view = PricingView {
        user: current.user(),
        tiers: &tiers,
        checkout_flash,
        beta_flash,
        beta_form,
    };
    views::html_response(status, pages::pricing_page(&view))
}

/// Message shown when the backend rejects or fails a signup.
///
/// Client errors carry text meant for the visitor (e.g. "already registered");
/// anything else stays in the log.
fn beta_failure_message(err: &BackendError) -> String {
    match (err.status(), err.server_message()) {
        (Some(status), Some(message)) if (400..500).contains(&status) => message.to_string(),
        _ => BETA_REGISTER_FAILED.to_string(),
    }
}

/// GET /pricing
pub async fn pricing_page(state: web::Data<AppState>, current: OptionalUser) -> HttpResponse {
    render_pricing(
        &state,
        &current,
        StatusCode::OK,
        None,
        None,
        &BetaSignup::default(),
    )
}

/// Registers the visitor for the beta programme.
///
/// POST /beta-register
pub async fn beta_register(
    state: web::Data<AppState>,
    current: OptionalUser,
    form: web::Form<BetaSignup>,
) -> HttpResponse {
    let signup = form.into_inner().normalized();

    if let Err(message) = signup.validate() {
        return render_pricing(
            &state,
            &current,
            StatusCode::BAD_REQUEST,
            None,
            Some(Flash::error(message)),
            &signup,
        );
    }

    match state.backend.register_beta(&signup).await {
        Ok(response) if response.success => {
            tracing::info!("Beta registration received for {}", signup.email);
            render_pricing(
                &state,
                &current,
                StatusCode::OK,
                None,
                Some(Flash::success(BETA_REGISTERED)),
                &BetaSignup::default(),
            )
        }
        Ok(response) => {
            let message = response
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| BETA_REGISTER_FAILED.to_string());
            tracing::info!("Beta registration for {} declined: {}", signup.email, message);
            render_pricing(
                &state,
                &current,
                StatusCode::OK,
                None,
                Some(Flash::error(message)),
                &signup,
            )
        }
        Err(e) => {
            tracing::error!("Beta registration for {} failed: {}", signup.email, e);
            render_pricing(
                &state,
                &current,
                StatusCode::BAD_GATEWAY,
                None,
                Some(Flash::error(beta_failure_message(&e))),
                &signup,
            )
        }
    }
}

/// Starts a checkout session and redirects the visitor to it.
///
/// POST /checkout
pub async fn checkout(
    state: web::Data<AppState>,
    current: OptionalUser,
    form: web::Form<CheckoutForm>,
) -> AppResult<HttpResponse> {
    let tier = pricing::find_tier(&state.config, form.tier_id.trim())
        .ok_or_else(|| AppError::BadRequest(format!("Unknown plan: {}", form.tier_id)))?;

    if tier.id == FREE_TIER {
        return Ok(HttpResponse::SeeOther()
            .append_header((header::LOCATION, "/pricing#beta"))
            .finish());
    }

    let base = &state.config.public_base_url;
    let request = CheckoutRequest {
        tier_id: tier.id.to_string(),
        price_id: tier.stripe_price_id.clone(),
        customer_email: current.user().map(|u| u.email.clone()),
        success_url: format!("{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}", base),
        cancel_url: format!("{}/payment/cancel", base),
    };

    match state.checkout.create_session(&request).await {
        Ok(session) => {
            tracing::info!("Checkout session created for tier {}", tier.id);
            Ok(HttpResponse::SeeOther()
                .append_header((header::LOCATION, session.url))
                .finish())
        }
        Err(e) => {
            tracing::error!("Checkout for tier {} failed: {}", tier.id, e);
            Ok(render_pricing(
                &state,
                &current,
                StatusCode::BAD_GATEWAY,
                Some(Flash::error(e.user_message())),
                None,
                &BetaSignup::default(),
            ))
        }
    }
}
