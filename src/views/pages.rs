//! Page builders, one per view.

use actix_web::http::StatusCode;

use super::{escape, flash_html, layout, render, Flash};
use crate::models::{BetaRegistration, BetaSignup, PricingTier, SessionUser, UploadStats};
use crate::services::upload::{size_label, CATEGORIES};

const PRIVACY: &str = include_str!("../templates/privacy.html");
const TERMS: &str = include_str!("../templates/terms.html");
const LEGAL_NOTICE: &str = include_str!("../templates/legal_notice.html");
const PRICING: &str = include_str!("../templates/pricing.html");
const LOGIN: &str = include_str!("../templates/login.html");
const ADMIN_UPLOAD: &str = include_str!("../templates/admin_upload.html");
const BETA_USERS: &str = include_str!("../templates/beta_users.html");
const ERROR: &str = include_str!("../templates/error.html");
const PAYMENT_SUCCESS: &str = include_str!("../templates/payment_success.html");
const PAYMENT_CANCEL: &str = include_str!("../templates/payment_cancel.html");

/// Shown instead of the table when no beta user has been confirmed.
pub const NO_BETA_USERS: &str = "No confirmed beta users yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalDocument {
    Privacy,
    Terms,
    LegalNotice,
}

impl LegalDocument {
    pub fn title(&self) -> &'static str {
        match self {
            LegalDocument::Privacy => "Privacy policy",
            LegalDocument::Terms => "Terms of service",
            LegalDocument::LegalNotice => "Legal notice",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            LegalDocument::Privacy => PRIVACY,
            LegalDocument::Terms => TERMS,
            LegalDocument::LegalNotice => LEGAL_NOTICE,
        }
    }
}

pub fn legal_page(document: LegalDocument, user: Option<&SessionUser>) -> String {
    layout(document.title(), user, document.template())
}

/// Everything the pricing page shows.
pub struct PricingView<'a> {
    pub user: Option<&'a SessionUser>,
    pub tiers: &'a [PricingTier],
    /// Checkout failure, shown above the tiers
    pub checkout_flash: Option<Flash>,
    /// Beta signup outcome, shown above the form
    pub beta_flash: Option<Flash>,
    /// Values to prefill the beta form with
    pub beta_form: &'a BetaSignup,
}

fn tier_card(tier: &PricingTier) -> String {
    let features: String = tier
        .features
        .iter()
        .map(|f| format!("<li>{}</li>", escape(f)))
        .collect();

    let action = if tier.is_free() {
        r##"<a class="primary" href="#beta">Join the beta</a>"##.to_string()
    } else {
        format!(
            r#"<form method="post" action="/checkout"><input type="hidden" name="tier_id" value="{}"><button class="primary" type="submit">Subscribe</button></form>"#,
            escape(tier.id)
        )
    };

    format!(
        r#"<div class="tier{}"><h2>{}</h2><p class="price">{}</p><ul>{}</ul>{}</div>"#,
        if tier.highlighted { " highlighted" } else { "" },
        escape(tier.name),
        escape(&tier.price_label()),
        features,
        action
    )
}

pub fn pricing_page(view: &PricingView<'_>) -> String {
    let tiers: String = view.tiers.iter().map(tier_card).collect();
    let checkout_flash = flash_html(view.checkout_flash.as_ref());
    let beta_flash = flash_html(view.beta_flash.as_ref());
    let email = escape(&view.beta_form.email);
    let name = escape(&view.beta_form.name);
    let company = escape(view.beta_form.company.as_deref().unwrap_or(""));

    let content = render(
        PRICING,
        &[
            ("CHECKOUT_FLASH", checkout_flash.as_str()),
            ("TIERS", tiers.as_str()),
            ("BETA_FLASH", beta_flash.as_str()),
            ("EMAIL", email.as_str()),
            ("NAME", name.as_str()),
            ("COMPANY", company.as_str()),
        ],
    );
    layout("Plans", view.user, &content)
}

pub fn login_page(next: &str, email: &str, flash: Option<&Flash>) -> String {
    let flash = flash_html(flash);
    let next = escape(next);
    let email = escape(email);
    let content = render(
        LOGIN,
        &[
            ("FLASH", flash.as_str()),
            ("NEXT", next.as_str()),
            ("EMAIL", email.as_str()),
        ],
    );
    layout("Sign in", None, &content)
}

/// Everything the upload page shows.
pub struct UploadView<'a> {
    pub user: &'a SessionUser,
    pub flash: Option<Flash>,
    pub stats: Option<&'a UploadStats>,
    pub title_value: &'a str,
    pub selected_category: &'a str,
    pub max_bytes: usize,
}

fn stats_html(stats: &UploadStats) -> String {
    let mut items = Vec::new();
    if let Some(id) = &stats.document_id {
        items.push(format!("<li>Document: {}</li>", escape(id)));
    }
    if let Some(pages) = stats.pages_processed {
        items.push(format!("<li>Pages processed: {}</li>", pages));
    }
    if let Some(chunks) = stats.chunks_created {
        items.push(format!("<li>Chunks created: {}</li>", chunks));
    }
    if let Some(secs) = stats.processing_time_seconds {
        items.push(format!("<li>Processing time: {:.1} s</li>", secs));
    }
    if items.is_empty() {
        return String::new();
    }
    format!(r#"<ul class="stats">{}</ul>"#, items.concat())
}

pub fn upload_page(view: &UploadView<'_>) -> String {
    let flash = flash_html(view.flash.as_ref());
    let stats = view.stats.map(stats_html).unwrap_or_default();
    let title_value = escape(view.title_value);
    let max_size = size_label(view.max_bytes);
    let options: String = CATEGORIES
        .iter()
        .map(|(id, label)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                id,
                if *id == view.selected_category { " selected" } else { "" },
                escape(label)
            )
        })
        .collect();

    let content = render(
        ADMIN_UPLOAD,
        &[
            ("MAX_SIZE", max_size.as_str()),
            ("FLASH", flash.as_str()),
            ("STATS", stats.as_str()),
            ("TITLE_VALUE", title_value.as_str()),
            ("CATEGORY_OPTIONS", options.as_str()),
        ],
    );
    layout("Upload document", Some(view.user), &content)
}

fn beta_users_table(users: &[BetaRegistration]) -> String {
    if users.is_empty() {
        return format!(r#"<div class="empty">{}</div>"#, NO_BETA_USERS);
    }

    let rows: String = users
        .iter()
        .map(|u| {
            let granted = u
                .access_granted_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&u.email),
                escape(u.name.as_deref().unwrap_or("-")),
                escape(u.company.as_deref().unwrap_or("-")),
                u.questions_used,
                u.tokens_used,
                granted
            )
        })
        .collect();

    format!(
        "<p>{} users</p><table><thead><tr><th>Email</th><th>Name</th><th>Company</th><th>Questions</th><th>Tokens</th><th>Access granted</th></tr></thead><tbody>{}</tbody></table>",
        users.len(),
        rows
    )
}

pub fn beta_users_page(
    user: &SessionUser,
    users: &[BetaRegistration],
    flash: Option<&Flash>,
) -> String {
    let flash = flash_html(flash);
    let table = beta_users_table(users);
    let content = render(
        BETA_USERS,
        &[("FLASH", flash.as_str()), ("TABLE", table.as_str())],
    );
    layout("Beta users", Some(user), &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = match status {
        StatusCode::FORBIDDEN => "Access denied",
        StatusCode::NOT_FOUND => "Page not found",
        s if s.is_client_error() => "Request error",
        _ => "Something went wrong",
    };
    let message = escape(message);
    let content = render(
        ERROR,
        &[("HEADING", heading), ("MESSAGE", message.as_str())],
    );
    layout(heading, None, &content)
}

pub fn payment_success_page(user: Option<&SessionUser>) -> String {
    layout("Payment successful", user, PAYMENT_SUCCESS)
}

pub fn payment_cancel_page(user: Option<&SessionUser>) -> String {
    layout("Payment cancelled", user, PAYMENT_CANCEL)
}
