//! Tests for the public site: health, legal pages, pricing, beta signup and
//! checkout.

mod common;

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};

use arquinorma_web::handlers;
use arquinorma_web::middleware::form_rate_limiter_config;
use arquinorma_web::handlers::pricing::{BETA_REGISTERED, BETA_REGISTER_FAILED};
use arquinorma_web::models::BetaRegisterResponse;
use arquinorma_web::services::checkout::GENERIC_CHECKOUT_ERROR;

use common::*;

macro_rules! init_app {
    ($config:expr, $backend:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($config, $backend.clone())))
                .configure(|cfg| handlers::configure(cfg, &form_rate_limiter_config())),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "arquinorma-web");
    assert!(body["version"].is_string());
}

#[actix_web::test]
async fn test_index_redirects_to_pricing() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/pricing");
}

#[actix_web::test]
async fn test_legal_pages_render() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    for (path, heading) in [
        ("/privacy", "Privacy"),
        ("/terms", "Terms"),
        ("/legal", "Legal notice"),
    ] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", path);
        let body = body_text(&test::read_body(resp).await);
        assert!(body.contains(heading), "{} missing {}", path, heading);
    }
}

#[actix_web::test]
async fn test_unknown_path_renders_not_found_page() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = test::TestRequest::get().uri("/wp-admin").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("Page not found"));
}

#[actix_web::test]
async fn test_pricing_page_lists_tiers() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = test::TestRequest::get().uri("/pricing").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("€29/month"));
    assert!(body.contains("€79/month"));
    assert!(body.contains(r#"name="tier_id" value="professional""#));
    assert!(body.contains(r#"action="/beta-register""#));
    // Anonymous visitors get no admin links
    assert!(!body.contains("/admin/upload"));
}

#[actix_web::test]
async fn test_pricing_page_shows_admin_links_to_staff() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = with_session(test::TestRequest::get().uri("/pricing"), STAFF_TOKEN).to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains(r#"href="/admin/upload""#));
    assert!(body.contains(r#"href="/admin/beta-users""#));
}

#[actix_web::test]
async fn test_beta_register_success_clears_form() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = form_post("/beta-register")
        .set_form([
            ("email", " pau@estudi.test "),
            ("name", "Pau"),
            ("company", "Estudi Pau"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains(BETA_REGISTERED));
    assert!(!body.contains("pau@estudi.test"));
    assert!(body.contains(r#"name="email" value="""#));

    assert_eq!(FakeBackend::calls(&backend.register_calls), 1);
    let sent = backend.last_signup.lock().unwrap().clone().unwrap();
    assert_eq!(sent.email, "pau@estudi.test");
    assert_eq!(sent.company.as_deref(), Some("Estudi Pau"));
}

#[actix_web::test]
async fn test_beta_register_invalid_email_keeps_form() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = form_post("/beta-register")
        .set_form([("email", "pau@estudi"), ("name", "Pau")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("Please enter a valid email address"));
    assert!(body.contains(r#"value="pau@estudi""#));
    assert_eq!(FakeBackend::calls(&backend.register_calls), 0);
}

#[actix_web::test]
async fn test_beta_register_declined_shows_server_error() {
    let backend = Arc::new(FakeBackend {
        register: Reply::Ok(BetaRegisterResponse {
            success: false,
            error: Some("This email is already registered".to_string()),
        }),
        ..Default::default()
    });
    let app = init_app!(test_config(), backend);

    let req = form_post("/beta-register")
        .set_form([("email", "pau@estudi.test"), ("name", "Pau")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("This email is already registered"));
    assert!(body.contains(r#"value="pau@estudi.test""#));
}

#[actix_web::test]
async fn test_beta_register_backend_failure_is_generic() {
    let backend = Arc::new(FakeBackend {
        register: Reply::Status(500, "Internal Server Error".to_string()),
        ..Default::default()
    });
    let app = init_app!(test_config(), backend);

    let req = form_post("/beta-register")
        .set_form([("email", "pau@estudi.test"), ("name", "Pau")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains(BETA_REGISTER_FAILED));
    assert!(body.contains(r#"value="pau@estudi.test""#));
}

#[actix_web::test]
async fn test_checkout_redirects_to_provider() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = with_session(form_post("/checkout"), USER_TOKEN)
        .set_form([("tier_id", "professional")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://checkout.stripe.test/c/pay/cs_test_1"
    );

    let sent = backend.last_checkout.lock().unwrap().clone().unwrap();
    assert_eq!(sent.tier_id, "professional");
    assert_eq!(sent.customer_email.as_deref(), Some(USER_EMAIL));
    assert_eq!(
        sent.success_url,
        "http://localhost:8080/payment/success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(sent.cancel_url, "http://localhost:8080/payment/cancel");
}

#[actix_web::test]
async fn test_checkout_failure_surfaces_server_text() {
    let backend = Arc::new(FakeBackend {
        checkout: Reply::Status(400, "No such price: price_123".to_string()),
        ..Default::default()
    });
    let app = init_app!(test_config(), backend);

    let req = form_post("/checkout")
        .set_form([("tier_id", "business")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("No such price: price_123"));
    assert!(body.contains("€79/month"));
}

#[actix_web::test]
async fn test_checkout_failure_without_text_is_generic() {
    let backend = Arc::new(FakeBackend {
        checkout: Reply::Status(502, "".to_string()),
        ..Default::default()
    });
    let app = init_app!(test_config(), backend);

    let req = form_post("/checkout")
        .set_form([("tier_id", "business")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains(GENERIC_CHECKOUT_ERROR));
}

#[actix_web::test]
async fn test_checkout_free_tier_goes_to_beta_form() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = form_post("/checkout")
        .set_form([("tier_id", "free")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/pricing#beta");
    assert_eq!(FakeBackend::calls(&backend.checkout_calls), 0);
}

#[actix_web::test]
async fn test_checkout_unknown_tier_is_bad_request() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    let req = form_post("/checkout")
        .set_form([("tier_id", "enterprise")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(FakeBackend::calls(&backend.checkout_calls), 0);
}

#[actix_web::test]
async fn test_payment_result_pages() {
    let backend = Arc::new(FakeBackend::default());
    let app = init_app!(test_config(), backend);

    for path in ["/payment/success?session_id=cs_test_1", "/payment/cancel"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", path);
    }
}
