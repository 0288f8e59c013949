//! Checkout result pages.
//!
//! The payment provider sends the visitor back here after checkout. The
//! subscription itself is recorded by the backend, so these pages only
//! report the outcome.

use actix_web::HttpResponse;

use crate::middleware::OptionalUser;
use crate::views::{self, pages};

/// Payment success page - shown after a completed checkout
///
/// GET /payment/success
pub async fn payment_success(current: OptionalUser) -> HttpResponse {
    views::html_ok(pages::payment_success_page(current.user()))
}

/// Payment cancelled page - shown when the visitor abandons checkout
///
/// GET /payment/cancel
pub async fn payment_cancel(current: OptionalUser) -> HttpResponse {
    views::html_ok(pages::payment_cancel_page(current.user()))
}
