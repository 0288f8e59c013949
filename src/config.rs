use std::env;
use thiserror::Error;

use crate::models::{Role, SessionUser};

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    // REST backend (beta registrations, document ingestion, checkout)
    pub backend_url: String,
    // Identity/session service
    pub identity_url: String,
    pub identity_anon_key: String,
    pub host: String,
    pub port: u16,
    pub app_env: String,
    // Base URL of this site (used for checkout return URLs)
    pub public_base_url: String,
    // Stripe payment settings (direct checkout when present)
    pub stripe_secret_key: Option<String>,
    pub stripe_price_professional: Option<String>,
    pub stripe_price_business: Option<String>,
    pub max_upload_bytes: usize,
    // Development identity, ignored in production
    pub dev_user_email: Option<String>,
    pub dev_user_role: Role,
    pub dev_user_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Skip loading .env in test mode to allow tests to control env vars
        if env::var("ARQUINORMA_TEST_MODE").is_err() {
            dotenvy::dotenv().ok();
        }

        // Required variables
        let backend_url = required("BACKEND_URL")?;
        let identity_url = required("IDENTITY_URL")?;
        let identity_anon_key = required("IDENTITY_ANON_KEY")?;

        // Optional variables with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .ok()
            .map(|v| {
                v.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                    var: "PORT".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(8080);

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let stripe_secret_key = non_empty("STRIPE_SECRET_KEY");
        let stripe_price_professional = non_empty("STRIPE_PRICE_PROFESSIONAL");
        let stripe_price_business = non_empty("STRIPE_PRICE_BUSINESS");

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .map(|v| {
                v.parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                    var: "MAX_UPLOAD_BYTES".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let dev_user_email = non_empty("DEV_USER_EMAIL");
        let dev_user_role = env::var("DEV_USER_ROLE")
            .map(|r| Role::parse(&r))
            .unwrap_or(Role::Admin);
        let dev_user_name = non_empty("DEV_USER_NAME");

        Ok(Config {
            backend_url: trim_slash(backend_url),
            identity_url: trim_slash(identity_url),
            identity_anon_key,
            host,
            port,
            app_env,
            public_base_url: trim_slash(public_base_url),
            stripe_secret_key,
            stripe_price_professional,
            stripe_price_business,
            max_upload_bytes,
            dev_user_email,
            dev_user_role,
            dev_user_name,
        })
    }

    /// Builds a configuration with every optional setting at its default.
    ///
    /// Used for tooling and tests that do not read the environment.
    pub fn with_defaults(backend_url: &str, identity_url: &str, identity_anon_key: &str) -> Self {
        Config {
            backend_url: trim_slash(backend_url.to_string()),
            identity_url: trim_slash(identity_url.to_string()),
            identity_anon_key: identity_anon_key.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            app_env: "development".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            stripe_secret_key: None,
            stripe_price_professional: None,
            stripe_price_business: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            dev_user_email: None,
            dev_user_role: Role::Admin,
            dev_user_name: None,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Session cookies get the secure flag when the site is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }

    /// The test-mode identity, if one is configured.
    ///
    /// Never returned in production, whatever the environment says.
    pub fn dev_identity(&self) -> Option<SessionUser> {
        if self.is_production() {
            return None;
        }
        self.dev_user_email.as_ref().map(|email| SessionUser {
            id: "dev-user".to_string(),
            email: email.clone(),
            role: self.dev_user_role,
            full_name: self.dev_user_name.clone(),
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::MissingVar(var.to_string()))
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_identity_disabled_in_production() {
        let mut config = Config::with_defaults("http://backend.test", "http://identity.test", "anon");
        config.dev_user_email = Some("dev@arquinorma.test".to_string());
        assert!(config.dev_identity().is_some());

        config.app_env = "Production".to_string();
        assert!(config.dev_identity().is_none());
    }

    #[test]
    fn test_dev_identity_uses_configured_role() {
        let mut config = Config::with_defaults("http://backend.test", "http://identity.test", "anon");
        config.dev_user_email = Some("dev@arquinorma.test".to_string());
        config.dev_user_role = Role::Staff;

        let user = config.dev_identity().expect("dev identity");
        assert_eq!(user.role, Role::Staff);
        assert_eq!(user.email, "dev@arquinorma.test");
    }

    #[test]
    fn test_secure_cookies() {
        let mut config = Config::with_defaults("http://backend.test", "http://identity.test", "anon");
        assert!(!config.secure_cookies());
        config.public_base_url = "https://arquinorma.cat".to_string();
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_trim_slash() {
        assert_eq!(trim_slash("http://a.test/".to_string()), "http://a.test");
        assert_eq!(trim_slash("http://a.test".to_string()), "http://a.test");
    }
}
