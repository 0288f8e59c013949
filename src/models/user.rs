//! Session user and role model.
//!
//! Users live in the external identity service; this crate only reads them.

use serde::{Deserialize, Serialize};

/// Authorization tier of a user.
///
/// Unknown role strings coming from the identity service are treated as
/// [`Role::User`], so a typo in a profile never grants admin access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Role {
    User,
    Staff,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "staff" => Role::Staff,
            "admin" => Role::Admin,
            "super_admin" => Role::SuperAdmin,
            _ => Role::User,
        }
    }

    /// Whether the role may access the administrative views.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

/// The authenticated visitor, assembled from the session and the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Identity service user id
    pub id: String,

    pub email: String,

    pub role: Role,

    /// Display name from the profile, when set
    pub full_name: Option<String>,
}

impl SessionUser {
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
