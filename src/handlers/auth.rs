//! Sign-in handlers and shared application state.
//!
//! This module provides the following endpoints:
//! - `GET /login` - Sign-in form (redirects to `next` when already signed in,
//!   unless `reauth` is set because the backend rejected the session)
//! - `POST /login` - Password sign-in against the identity service; sets the session cookie
//! - `POST /logout` - Clears the session cookie

use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::error::GENERIC_ERROR;
use crate::middleware::auth::{clear_session_cookie, session_cookie, OptionalUser};
use crate::services::{
    BackendApi, BackendCheckout, CheckoutProvider, HttpBackendClient, HttpIdentityClient,
    IdentityProvider, StaticIdentity, StripeCheckout, StripeClientService,
};
use crate::views::{self, pages, Flash};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Identity/session service
    pub identity: Arc<dyn IdentityProvider>,
    /// REST backend
    pub backend: Arc<dyn BackendApi>,
    /// Payment checkout
    pub checkout: Arc<dyn CheckoutProvider>,
}

impl AppState {
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        backend: Arc<dyn BackendApi>,
        checkout: Arc<dyn CheckoutProvider>,
    ) -> Self {
        Self {
            config,
            identity,
            backend,
            checkout,
        }
    }

    /// Wires the production services described by `config`.
    ///
    /// The static identity replaces the identity service when a development
    /// user is configured (never in production). Checkout goes straight to
    /// Stripe when a secret key is set, otherwise through the backend.
    pub fn from_config(config: Config, http_client: reqwest::Client) -> Self {
        let backend: Arc<dyn BackendApi> =
            Arc::new(HttpBackendClient::new(http_client.clone(), &config.backend_url));

        let identity: Arc<dyn IdentityProvider> = match config.dev_identity() {
            Some(user) => {
                tracing::warn!(
                    "Using static development identity {} ({})",
                    user.email,
                    user.role.as_str()
                );
                Arc::new(StaticIdentity::new(user))
            }
            None => Arc::new(HttpIdentityClient::new(
                http_client,
                &config.identity_url,
                &config.identity_anon_key,
            )),
        };

        let checkout: Arc<dyn CheckoutProvider> = match &config.stripe_secret_key {
            Some(key) => {
                tracing::info!("Stripe checkout configured");
                Arc::new(StripeCheckout::new(StripeClientService::new(key.clone())))
            }
            None => Arc::new(BackendCheckout::new(backend.clone())),
        };

        Self::new(config, identity, backend, checkout)
    }
}

/// Query parameters of the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Where to go after signing in
    pub next: Option<String>,
    /// Set when the backend rejected the session; always show the form
    #[serde(default)]
    pub reauth: Option<String>,
}

/// Form data for password sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Restricts post-login redirects to paths on this site.
///
/// Browsers drop tabs and newlines and treat `\` as `/` when parsing a URL,
/// so any of those could turn a path into `//host`. Such targets fall back to `/`.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if is_local_path(path) && !path.starts_with("/login") => path.to_string(),
        _ => "/".to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    // `//host` is an authority, not a path
    !rest.starts_with('/')
        && !path
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || c == '\\')
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish()
}

/// Renders the sign-in form.
///
/// GET /login
pub async fn login_page(query: web::Query<LoginQuery>, current: OptionalUser) -> HttpResponse {
    let next = safe_next(query.next.as_deref());

    if current.0.is_some() && query.reauth.is_none() {
        return redirect(&next);
    }

    views::html_ok(pages::login_page(&next, "", None))
}

/// Signs the visitor in and stores the access token in the session cookie.
///
/// POST /login
pub async fn login(form: web::Form<LoginForm>, state: web::Data<AppState>) -> HttpResponse {
    let next = safe_next(form.next.as_deref());
    let email = form.email.trim();

    if email.is_empty() || form.password.is_empty() {
        let flash = Flash::error("Please enter your email and password");
        return views::html_response(
            StatusCode::BAD_REQUEST,
            pages::login_page(&next, email, Some(&flash)),
        );
    }

    match state.identity.sign_in(email, &form.password).await {
        Ok(Some(token)) => {
            tracing::info!("User {} signed in", email);
            let cookie = session_cookie(&token, state.config.secure_cookies());
            HttpResponse::SeeOther()
                .append_header((header::SET_COOKIE, cookie.to_string()))
                .append_header((header::LOCATION, next))
                .finish()
        }
        Ok(None) => {
            tracing::info!("Rejected sign-in for {}", email);
            let flash = Flash::error("Invalid email or password");
            views::html_response(
                StatusCode::UNAUTHORIZED,
                pages::login_page(&next, email, Some(&flash)),
            )
        }
        Err(e) => {
            tracing::error!("Sign-in request failed: {}", e);
            let flash = Flash::error(GENERIC_ERROR);
            views::html_response(
                StatusCode::BAD_GATEWAY,
                pages::login_page(&next, email, Some(&flash)),
            )
        }
    }
}

/// Clears the session cookie.
///
/// POST /logout
pub async fn logout() -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::SET_COOKIE, clear_session_cookie().to_string()))
        .append_header((header::LOCATION, "/"))
        .finish()
}
