//! Identity/session service client.
//!
//! This module provides:
//! - [`IdentityProvider`], the seam handlers authenticate through
//! - [`HttpIdentityClient`], the client for the hosted identity service
//! - [`StaticIdentity`], a fixed identity for local development and tests
//! - [`resolve_user`], which turns a session token into a [`SessionUser`]

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Role, SessionUser};

/// Errors that can occur while talking to the identity service.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with an unexpected status
    #[error("Identity service error: {message} (status: {status})")]
    Api { status: u16, message: String },

    /// Failed to parse the response body
    #[error("Invalid response from identity service")]
    InvalidResponse,
}

/// The user behind a valid session token.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile row looked up by user id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Returns the identity behind `token`, or `None` if the session is invalid or expired.
    async fn session(&self, token: &str) -> Result<Option<SessionIdentity>, IdentityError>;

    /// Looks up the profile of `user_id`. `None` when the user has no profile row.
    async fn profile(&self, user_id: &str, token: &str) -> Result<Option<Profile>, IdentityError>;

    /// Password sign-in. Returns an access token, or `None` on bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>, IdentityError>;
}

/// Session check followed by profile lookup.
///
/// A session without a profile row resolves to a plain [`Role::User`].
pub async fn resolve_user(
    provider: &dyn IdentityProvider,
    token: &str,
) -> Result<Option<SessionUser>, IdentityError> {
    if token.trim().is_empty() {
        return Ok(None);
    }

    let Some(identity) = provider.session(token).await? else {
        return Ok(None);
    };

    let profile = provider
        .profile(&identity.id, token)
        .await?
        .unwrap_or_default();

    Ok(Some(SessionUser {
        email: profile.email.or(identity.email).unwrap_or_default(),
        role: profile.role.unwrap_or(Role::User),
        full_name: profile.full_name,
        id: identity.id,
    }))
}

/// Client for the hosted identity service.
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl HttpIdentityClient {
    pub fn new(client: Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn api_error(response: reqwest::Response) -> IdentityError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        IdentityError::Api { status, message }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityClient {
    async fn session(&self, token: &str) -> Result<Option<SessionIdentity>, IdentityError> {
        let response = self
            .client
            .get(self.url("/auth/v1/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => response
                .json::<SessionIdentity>()
                .await
                .map(Some)
                .map_err(|_| IdentityError::InvalidResponse),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn profile(&self, user_id: &str, token: &str) -> Result<Option<Profile>, IdentityError> {
        let path = format!(
            "/rest/v1/profiles?id=eq.{}&select=role,email,full_name",
            urlencoding::encode(user_id)
        );
        let response = self
            .client
            .get(self.url(&path))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let rows: Vec<Profile> = response
            .json()
            .await
            .map_err(|_| IdentityError::InvalidResponse)?;

        Ok(rows.into_iter().next())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>, IdentityError> {
        let response = self
            .client
            .post(self.url("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status if status.is_success() => {
                let body: TokenResponse = response
                    .json()
                    .await
                    .map_err(|_| IdentityError::InvalidResponse)?;
                Ok(Some(body.access_token))
            }
            _ => Err(Self::api_error(response).await),
        }
    }
}

/// Token handed out by [`StaticIdentity::sign_in`].
pub const STATIC_SESSION_TOKEN: &str = "static-session";

/// A fixed identity for development and tests.
///
/// Signing in with the configured email (any password) yields
/// [`STATIC_SESSION_TOKEN`], which resolves to the configured user.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: SessionUser,
}

impl StaticIdentity {
    pub fn new(user: SessionUser) -> Self {
        Self { user }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn session(&self, token: &str) -> Result<Option<SessionIdentity>, IdentityError> {
        if token != STATIC_SESSION_TOKEN {
            return Ok(None);
        }
        Ok(Some(SessionIdentity {
            id: self.user.id.clone(),
            email: Some(self.user.email.clone()),
        }))
    }

    async fn profile(&self, user_id: &str, _token: &str) -> Result<Option<Profile>, IdentityError> {
        if user_id != self.user.id {
            return Ok(None);
        }
        Ok(Some(Profile {
            role: Some(self.user.role),
            email: Some(self.user.email.clone()),
            full_name: self.user.full_name.clone(),
        }))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>, IdentityError> {
        if email.trim().eq_ignore_ascii_case(&self.user.email) && !password.is_empty() {
            Ok(Some(STATIC_SESSION_TOKEN.to_string()))
        } else {
            Ok(None)
        }
    }
}
