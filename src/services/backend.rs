//! REST backend client.
//!
//! The backend owns beta registrations, document ingestion and checkout
//! session creation. This module wraps the four endpoints the site consumes.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    BetaRegisterResponse, BetaRegistration, BetaSignup, ConfirmedUsersResponse, UploadStats,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Invalid response from backend")]
    InvalidResponse,
}

/// How a backend failure is presented to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// 401: the session is no longer valid, sign in again
    Reauthenticate,
    /// 403: signed in but not allowed
    PermissionDenied,
    /// Anything else
    Generic,
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Request(e) => e.status().map(|s| s.as_u16()),
            BackendError::InvalidResponse => None,
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self.status() {
            Some(401) => FailureCategory::Reauthenticate,
            Some(403) => FailureCategory::PermissionDenied,
            _ => FailureCategory::Generic,
        }
    }

    /// Error text reported by the server, if it sent any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// A validated PDF ready to be forwarded to the backend.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub category: String,
}

/// Parameters of a checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub tier_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// A checkout session the visitor is redirected to.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    #[serde(alias = "checkout_url")]
    pub url: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[async_trait]
pub trait BackendApi: Send + Sync + 'static {
    /// `GET /api/admin/beta/confirmed`
    async fn confirmed_beta_users(&self, token: &str)
        -> Result<Vec<BetaRegistration>, BackendError>;

    /// `POST /admin/upload`
    async fn upload_document(
        &self,
        token: &str,
        document: UploadDocument,
    ) -> Result<UploadStats, BackendError>;

    /// `POST /stripe/create-checkout-session`
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BackendError>;

    /// `POST /api/beta-register`
    async fn register_beta(&self, signup: &BetaSignup) -> Result<BetaRegisterResponse, BackendError>;
}

/// Pulls a human readable message out of an error body.
///
/// Looks at `error` (string or `{message}`), `detail` and `message`, in that
/// order, and falls back to the raw body.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.get("error").and_then(|e| e.as_str()),
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str()),
            value.get("detail").and_then(|d| d.as_str()),
            value.get("message").and_then(|m| m.as_str()),
        ];
        if let Some(message) = candidates.into_iter().flatten().find(|m| !m.is_empty()) {
            return message.to_string();
        }
    }
    body.trim().to_string()
}

/// Backend API client
#[derive(Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("Failed to decode backend response: {}", e);
            BackendError::InvalidResponse
        })
    }
}

#[async_trait]
impl BackendApi for HttpBackendClient {
    async fn confirmed_beta_users(
        &self,
        token: &str,
    ) -> Result<Vec<BetaRegistration>, BackendError> {
        let response = self
            .client
            .get(self.url("/api/admin/beta/confirmed"))
            .bearer_auth(token)
            .send()
            .await?;

        let body: ConfirmedUsersResponse = Self::read_json(response).await?;
        Ok(body.users)
    }

    async fn upload_document(
        &self,
        token: &str,
        document: UploadDocument,
    ) -> Result<UploadStats, BackendError> {
        let file = Part::bytes(document.bytes)
            .file_name(document.filename)
            .mime_str("application/pdf")?;

        let form = Form::new()
            .part("file", file)
            .text("title", document.title)
            .text("category", document.category);

        let response = self
            .client
            .post(self.url("/admin/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BackendError> {
        let response = self
            .client
            .post(self.url("/stripe/create-checkout-session"))
            .json(request)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn register_beta(&self, signup: &BetaSignup) -> Result<BetaRegisterResponse, BackendError> {
        let response = self
            .client
            .post(self.url("/api/beta-register"))
            .json(signup)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
