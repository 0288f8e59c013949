//! Staff-only admin pages.
//!
//! This module provides the following endpoints:
//! - `GET /admin/upload` - Document upload form
//! - `POST /admin/upload` - Validates a PDF and forwards it to the backend for indexing
//! - `GET /admin/beta-users` - Confirmed beta users with their usage
//!
//! All of them require a staff session (see [`StaffUser`]). The visitor's access
//! token is forwarded to the backend, which checks the role again.

use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpResponse};

use crate::error::{AppError, AppResult, GENERIC_ERROR, PERMISSION_DENIED};
use crate::handlers::auth::AppState;
use crate::middleware::StaffUser;
use crate::models::UploadStats;
use crate::services::upload::{read_upload_form, DEFAULT_CATEGORY};
use crate::services::{BackendError, FailureCategory};
use crate::views::{self, pages, pages::UploadView, Flash};

const UPLOAD_PATH: &str = "/admin/upload";
const BETA_USERS_PATH: &str = "/admin/beta-users";

/// Maps a backend failure on an admin page to what the visitor sees.
///
/// An expired token ends the session and sends the visitor to the login form.
/// A role rejection renders the permission page. Anything else becomes an
/// inline message on the page itself.
fn admin_failure(err: BackendError, next: &str) -> Result<Flash, AppError> {
    match err.category() {
        FailureCategory::Reauthenticate => {
            tracing::info!("Backend rejected session token on {}", next);
            Err(AppError::SessionExpired {
                next: next.to_string(),
            })
        }
        FailureCategory::PermissionDenied => {
            tracing::warn!("Backend denied access to {}", next);
            Err(AppError::Forbidden(PERMISSION_DENIED.to_string()))
        }
        FailureCategory::Generic => {
            tracing::error!("Backend request for {} failed: {}", next, err);
            Ok(Flash::error(GENERIC_ERROR))
        }
    }
}

fn render_upload(
    staff: &StaffUser,
    state: &AppState,
    status: StatusCode,
    flash: Option<Flash>,
    stats: Option<&UploadStats>,
    title_value: &str,
    selected_category: &str,
) -> HttpResponse {
    let view = UploadView {
        user: &staff.user,
        flash,
        stats,
        title_value,
        selected_category,
        max_bytes: state.config.max_upload_bytes,
    };
    views::html_response(status, pages::upload_page(&view))
}

/// GET /admin/upload
pub async fn upload_form(staff: StaffUser, state: web::Data<AppState>) -> HttpResponse {
    render_upload(
        &staff,
        &state,
        StatusCode::OK,
        None,
        None,
        "",
        DEFAULT_CATEGORY,
    )
}

/// Validates the uploaded PDF and forwards it to the backend.
///
/// Invalid files are rejected here, before the backend is called.
///
/// POST /admin/upload
pub async fn upload_document(
    staff: StaffUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let max_bytes = state.config.max_upload_bytes;

    let form = match read_upload_form(payload, max_bytes).await {
        Ok(form) => form,
        Err(e) => {
            tracing::info!("Rejected upload from {}: {}", staff.user.email, e);
            return Ok(render_upload(
                &staff,
                &state,
                StatusCode::BAD_REQUEST,
                Some(Flash::error(e.to_string())),
                None,
                "",
                DEFAULT_CATEGORY,
            ));
        }
    };

    let title_value = form.title.clone();
    let selected_category = match form.category.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        c => c.to_string(),
    };

    let document = match form.into_document(max_bytes) {
        Ok(document) => document,
        Err(e) => {
            tracing::info!("Rejected upload from {}: {}", staff.user.email, e);
            return Ok(render_upload(
                &staff,
                &state,
                StatusCode::BAD_REQUEST,
                Some(Flash::error(e.to_string())),
                None,
                &title_value,
                &selected_category,
            ));
        }
    };

    tracing::info!(
        "Uploading {} ({} bytes, category {}) for {}",
        document.filename,
        document.bytes.len(),
        document.category,
        staff.user.email
    );

    match state.backend.upload_document(&staff.token, document).await {
        Ok(stats) => {
            let message = stats
                .message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Document uploaded and indexed".to_string());
            Ok(render_upload(
                &staff,
                &state,
                StatusCode::OK,
                Some(Flash::success(message)),
                Some(&stats),
                "",
                DEFAULT_CATEGORY,
            ))
        }
        Err(e) => {
            let flash = admin_failure(e, UPLOAD_PATH)?;
            Ok(render_upload(
                &staff,
                &state,
                StatusCode::BAD_GATEWAY,
                Some(flash),
                None,
                &title_value,
                &selected_category,
            ))
        }
    }
}

/// Lists confirmed beta users.
///
/// On a generic backend failure the page still renders, with the empty state
/// under the error message.
///
/// GET /admin/beta-users
pub async fn beta_users(staff: StaffUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    match state.backend.confirmed_beta_users(&staff.token).await {
        Ok(users) => Ok(views::html_ok(pages::beta_users_page(
            &staff.user,
            &users,
            None,
        ))),
        Err(e) => {
            let flash = admin_failure(e, BETA_USERS_PATH)?;
            Ok(views::html_response(
                StatusCode::BAD_GATEWAY,
                pages::beta_users_page(&staff.user, &[], Some(&flash)),
            ))
        }
    }
}
