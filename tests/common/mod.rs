//! Shared fixtures for integration tests: in-memory identity and backend
//! fakes plus helpers to build the app and request bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::cookie::Cookie;
use actix_web::test::TestRequest;
use async_trait::async_trait;

use arquinorma_web::config::Config;
use arquinorma_web::handlers::AppState;
use arquinorma_web::middleware::SESSION_COOKIE;
use arquinorma_web::models::{
    BetaRegisterResponse, BetaRegistration, BetaSignup, Role, SessionUser, UploadStats,
};
use arquinorma_web::services::identity::{Profile, SessionIdentity};
use arquinorma_web::services::{
    BackendApi, BackendCheckout, BackendError, CheckoutRequest, CheckoutSession, IdentityError,
    IdentityProvider, UploadDocument,
};

pub const STAFF_TOKEN: &str = "staff-token";
pub const USER_TOKEN: &str = "user-token";
pub const STAFF_EMAIL: &str = "staff@arquinorma.test";
pub const USER_EMAIL: &str = "client@estudi.test";
pub const PASSWORD: &str = "correct horse";

/// Client address for form posts; the per-IP limiter needs a peer address.
pub const CLIENT_ADDR: &str = "203.0.113.7:52100";

pub fn test_config() -> Config {
    Config::with_defaults(
        "http://backend.test",
        "http://identity.test",
        "anon-key",
    )
}

/// POST to a rate-limited form route, from `CLIENT_ADDR`.
pub fn form_post(uri: &str) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .peer_addr(CLIENT_ADDR.parse().unwrap())
}

/// Identity service fake: fixed tokens and one password per user.
pub struct FakeIdentity {
    sessions: HashMap<String, SessionUser>,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(
            STAFF_TOKEN.to_string(),
            SessionUser {
                id: "u-staff".to_string(),
                email: STAFF_EMAIL.to_string(),
                role: Role::Staff,
                full_name: Some("Núria Staff".to_string()),
            },
        );
        sessions.insert(
            USER_TOKEN.to_string(),
            SessionUser {
                id: "u-client".to_string(),
                email: USER_EMAIL.to_string(),
                role: Role::User,
                full_name: None,
            },
        );
        Self { sessions }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn session(&self, token: &str) -> Result<Option<SessionIdentity>, IdentityError> {
        Ok(self.sessions.get(token).map(|u| SessionIdentity {
            id: u.id.clone(),
            email: Some(u.email.clone()),
        }))
    }

    async fn profile(&self, user_id: &str, _token: &str) -> Result<Option<Profile>, IdentityError> {
        Ok(self.sessions.values().find(|u| u.id == user_id).map(|u| Profile {
            role: Some(u.role),
            email: Some(u.email.clone()),
            full_name: u.full_name.clone(),
        }))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>, IdentityError> {
        if password != PASSWORD {
            return Ok(None);
        }
        Ok(self
            .sessions
            .iter()
            .find(|(_, u)| u.email == email)
            .map(|(token, _)| token.clone()))
    }
}

/// Outcome a fake backend call is scripted to produce.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, String),
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, BackendError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status, message) => Err(BackendError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Backend fake with scripted replies and call counters.
pub struct FakeBackend {
    pub beta_users: Reply<Vec<BetaRegistration>>,
    pub upload: Reply<UploadStats>,
    pub checkout: Reply<CheckoutSession>,
    pub register: Reply<BetaRegisterResponse>,
    pub beta_users_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub checkout_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub last_upload: Mutex<Option<UploadDocument>>,
    pub last_checkout: Mutex<Option<CheckoutRequest>>,
    pub last_signup: Mutex<Option<BetaSignup>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            beta_users: Reply::Ok(Vec::new()),
            upload: Reply::Ok(UploadStats {
                message: Some("Document indexed".to_string()),
                document_id: Some("doc-1".to_string()),
                pages_processed: Some(12),
                chunks_created: Some(48),
                processing_time_seconds: Some(3.25),
            }),
            checkout: Reply::Ok(CheckoutSession {
                url: "https://checkout.stripe.test/c/pay/cs_test_1".to_string(),
                session_id: Some("cs_test_1".to_string()),
            }),
            register: Reply::Ok(BetaRegisterResponse {
                success: true,
                error: None,
            }),
            beta_users_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            checkout_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            last_upload: Mutex::new(None),
            last_checkout: Mutex::new(None),
            last_signup: Mutex::new(None),
        }
    }
}

impl FakeBackend {
    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn confirmed_beta_users(
        &self,
        _token: &str,
    ) -> Result<Vec<BetaRegistration>, BackendError> {
        self.beta_users_calls.fetch_add(1, Ordering::SeqCst);
        self.beta_users.get()
    }

    async fn upload_document(
        &self,
        _token: &str,
        document: UploadDocument,
    ) -> Result<UploadStats, BackendError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_upload.lock().unwrap() = Some(document);
        self.upload.get()
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BackendError> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_checkout.lock().unwrap() = Some(request.clone());
        self.checkout.get()
    }

    async fn register_beta(&self, signup: &BetaSignup) -> Result<BetaRegisterResponse, BackendError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_signup.lock().unwrap() = Some(signup.clone());
        self.register.get()
    }
}

/// App state around the fakes. Checkout goes through the fake backend.
pub fn app_state(config: Config, backend: Arc<FakeBackend>) -> AppState {
    let backend_api: Arc<dyn BackendApi> = backend;
    AppState::new(
        config,
        Arc::new(FakeIdentity::default()),
        backend_api.clone(),
        Arc::new(BackendCheckout::new(backend_api)),
    )
}

pub fn with_session(req: TestRequest, token: &str) -> TestRequest {
    req.cookie(Cookie::new(SESSION_COOKIE, token.to_string()))
}

pub const BOUNDARY: &str = "----arquinormaTestBoundary";

/// A hand-built `multipart/form-data` body.
pub fn multipart_body(
    file: Option<(&str, &str, &[u8])>,
    title: &str,
    category: &str,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [("title", title), ("category", category)] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn body_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
