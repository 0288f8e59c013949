//! Session authentication and role checks.
//!
//! This module provides:
//! - `CurrentUser` extractor: a signed-in visitor, or a redirect to the login page
//! - `StaffUser` extractor: a signed-in visitor with a staff role, or a 403 page
//! - `OptionalUser` extractor: the visitor if signed in, never fails
//! - helpers to set and clear the session cookie

use actix_web::{cookie::Cookie, dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use time::Duration as TimeDuration;

use crate::error::{AppError, PERMISSION_DENIED};
use crate::handlers::auth::AppState;
use crate::models::SessionUser;
use crate::services::identity::{resolve_user, STATIC_SESSION_TOKEN};

/// Name of the cookie holding the identity service access token.
pub const SESSION_COOKIE: &str = "arquinorma_session";

/// Lifetime of the session cookie. The token itself may expire sooner.
const SESSION_MAX_AGE_HOURS: i64 = 12;

/// A signed-in visitor.
///
/// # Example
///
/// ```ignore
/// async fn account(current: CurrentUser) -> impl Responder {
///     format!("Hello, {}", current.user.display_name())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
    /// Access token forwarded to the backend
    pub token: String,
}

/// A signed-in visitor whose role grants access to the admin views.
#[derive(Debug, Clone)]
pub struct StaffUser {
    pub user: SessionUser,
    pub token: String,
}

/// The visitor, if signed in. Identity failures are logged and treated as anonymous.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    pub fn user(&self) -> Option<&SessionUser> {
        self.0.as_ref().map(|c| &c.user)
    }
}

pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(actix_web::cookie::SameSite::Lax)
        .max_age(TimeDuration::hours(SESSION_MAX_AGE_HOURS))
        .finish()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(TimeDuration::seconds(0))
        .finish()
}

fn session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Path and query of the request, used as the post-login target.
fn request_target(req: &HttpRequest) -> String {
    match req.uri().path_and_query() {
        Some(pq) => pq.as_str().to_string(),
        None => req.path().to_string(),
    }
}

async fn authenticate(
    state: Option<web::Data<AppState>>,
    token: Option<String>,
    next: String,
) -> Result<CurrentUser, AppError> {
    let state = state.ok_or_else(|| AppError::Internal("Application state missing".to_string()))?;

    let Some(token) = token else {
        // Development fallback; `dev_identity` is always None in production
        if let Some(user) = state.config.dev_identity() {
            return Ok(CurrentUser {
                user,
                token: STATIC_SESSION_TOKEN.to_string(),
            });
        }
        return Err(AppError::Unauthenticated { next });
    };

    match resolve_user(state.identity.as_ref(), &token).await? {
        Some(user) => Ok(CurrentUser { user, token }),
        None => {
            tracing::debug!("Session rejected by identity service");
            Err(AppError::Unauthenticated { next })
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = session_token(req);
        let next = request_target(req);

        Box::pin(authenticate(state, token, next))
    }
}

impl FromRequest for StaffUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = session_token(req);
        let next = request_target(req);

        Box::pin(async move {
            let current = authenticate(state, token, next.clone()).await?;

            if !current.user.is_staff() {
                tracing::warn!(
                    "User {} with role {} denied access to {}",
                    current.user.email,
                    current.user.role.as_str(),
                    next
                );
                return Err(AppError::Forbidden(PERMISSION_DENIED.to_string()));
            }

            Ok(StaffUser {
                user: current.user,
                token: current.token,
            })
        })
    }
}

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = session_token(req);
        let next = request_target(req);

        Box::pin(async move {
            match authenticate(state, token, next).await {
                Ok(current) => Ok(OptionalUser(Some(current))),
                Err(AppError::Unauthenticated { .. }) => Ok(OptionalUser(None)),
                Err(e) => {
                    tracing::warn!("Could not resolve session, continuing anonymously: {}", e);
                    Ok(OptionalUser(None))
                }
            }
        })
    }
}
