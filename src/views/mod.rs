//! HTML rendering.
//!
//! Pages are HTML templates under `src/templates/` compiled in with
//! `include_str!`. Placeholders look like `{{NAME}}` and are substituted in a
//! single pass, so substituted text is never scanned for further placeholders.
//! Dynamic text must go through [`escape`] before it is substituted.

pub mod pages;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use crate::models::SessionUser;

const LAYOUT: &str = include_str!("../templates/layout.html");

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Substitutes `{{KEY}}` placeholders. Unknown placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match vars.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// An inline status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }

    pub fn to_html(&self) -> String {
        let class = match self.kind {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        };
        format!(
            r#"<div class="flash {}" role="status">{}</div>"#,
            class,
            escape(&self.text)
        )
    }
}

/// Renders an optional flash, empty when there is none.
pub fn flash_html(flash: Option<&Flash>) -> String {
    flash.map(Flash::to_html).unwrap_or_default()
}

fn nav(user: Option<&SessionUser>) -> String {
    let mut links = String::from(r#"<a href="/pricing">Plans</a>"#);
    match user {
        Some(user) => {
            if user.is_staff() {
                links.push_str(r#"<a href="/admin/upload">Upload</a>"#);
                links.push_str(r#"<a href="/admin/beta-users">Beta users</a>"#);
            }
            links.push_str(&format!(
                r#"<form method="post" action="/logout"><button type="submit" title="{}">Sign out</button></form>"#,
                escape(user.display_name())
            ));
        }
        None => links.push_str(r#"<a href="/login">Sign in</a>"#),
    }
    links
}

/// Wraps page content in the site layout.
pub fn layout(title: &str, user: Option<&SessionUser>, content: &str) -> String {
    let title = escape(title);
    let nav = nav(user);
    render(
        LAYOUT,
        &[
            ("TITLE", title.as_str()),
            ("NAV", nav.as_str()),
            ("CONTENT", content),
        ],
    )
}

pub fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub fn html_ok(body: String) -> HttpResponse {
    html_response(StatusCode::OK, body)
}
