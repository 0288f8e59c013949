//! Beta programme records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed beta user as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetaRegistration {
    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub questions_used: i64,

    #[serde(default)]
    pub tokens_used: i64,

    /// When access to the beta was granted
    #[serde(default)]
    pub access_granted_at: Option<DateTime<Utc>>,
}

/// Body of `GET /api/admin/beta/confirmed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmedUsersResponse {
    #[serde(default)]
    pub users: Vec<BetaRegistration>,
}

/// A beta signup submitted from the pricing page.
///
/// Missing form fields deserialize as empty and are caught by [`BetaSignup::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetaSignup {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl BetaSignup {
    /// Trims every field and drops an empty company.
    pub fn normalized(&self) -> Self {
        let company = self
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self {
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            company,
        }
    }

    /// Checks the fields the form requires.
    ///
    /// The email must have a local part, an `@`, and a dot somewhere in the domain.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Please enter your name".to_string());
        }
        let email = self.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
        if !valid_email {
            return Err("Please enter a valid email address".to_string());
        }
        Ok(())
    }
}

/// Body of `POST /api/beta-register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetaRegisterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
