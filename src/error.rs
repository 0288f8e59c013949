//! Unified error handling for the arquinorma-web application.
//!
//! This module provides a centralized error type (`AppError`) that handles
//! all errors throughout the application and maps them to HTML responses.
//! Visitors only ever see a short message; upstream details go to the log.

use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::middleware::auth::clear_session_cookie;
use crate::services::backend::BackendError;
use crate::services::identity::IdentityError;
use crate::views;

/// Message shown when the visitor is signed in but lacks a staff role.
pub const PERMISSION_DENIED: &str = "You do not have permission to access this page";

/// Message shown for every failure whose details stay server-side.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again later.";

/// Unified application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Identity service errors
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Backend API errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// No valid session; the visitor is sent to the login page
    #[error("Authentication required for {next}")]
    Unauthenticated { next: String },

    /// The backend rejected the session token. The cookie is dropped and the
    /// login form is shown even if the identity service still accepts the token.
    #[error("Session expired on {next}")]
    SessionExpired { next: String },

    /// Signed in without the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Login URL that returns the visitor to `next` afterwards.
pub fn login_url(next: &str) -> String {
    if next.is_empty() || next == "/" {
        "/login".to_string()
    } else {
        format!("/login?next={}", urlencoding::encode(next))
    }
}

/// Login URL that forces the sign-in form, for sessions the backend rejected.
pub fn reauth_login_url(next: &str) -> String {
    let url = login_url(next);
    if url.contains('?') {
        format!("{}&reauth=1", url)
    } else {
        format!("{}?reauth=1", url)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Identity(_) => StatusCode::BAD_GATEWAY,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthenticated { .. } | AppError::SessionExpired { .. } => {
                StatusCode::SEE_OTHER
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthenticated { next } => {
                return HttpResponse::SeeOther()
                    .append_header((header::LOCATION, login_url(next)))
                    .finish();
            }
            AppError::SessionExpired { next } => {
                return HttpResponse::SeeOther()
                    .append_header((header::SET_COOKIE, clear_session_cookie().to_string()))
                    .append_header((header::LOCATION, reauth_login_url(next)))
                    .finish();
            }
            // Don't expose upstream or internal details
            AppError::Config(_)
            | AppError::Identity(_)
            | AppError::Backend(_)
            | AppError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                GENERIC_ERROR
            }
            AppError::Forbidden(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                msg.as_str()
            }
        };

        views::html_response(
            self.status_code(),
            views::pages::error_page(self.status_code(), message),
        )
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
