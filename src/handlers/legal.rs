//! Static public pages.

use actix_web::{http::header, HttpResponse};

use crate::middleware::OptionalUser;
use crate::views::{self, pages, pages::LegalDocument};

/// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/pricing"))
        .finish()
}

/// GET /privacy
pub async fn privacy(current: OptionalUser) -> HttpResponse {
    views::html_ok(pages::legal_page(LegalDocument::Privacy, current.user()))
}

/// GET /terms
pub async fn terms(current: OptionalUser) -> HttpResponse {
    views::html_ok(pages::legal_page(LegalDocument::Terms, current.user()))
}

/// GET /legal
pub async fn legal_notice(current: OptionalUser) -> HttpResponse {
    views::html_ok(pages::legal_page(LegalDocument::LegalNotice, current.user()))
}
