//! REST surface driven through the full router: role guard, JWT
//! middleware and the payment webhook.

mod common;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::fixtures::{self, random_phone};
use common::TestHarness;
use homefix_core::domains::profiles::models::{Profile, Role};
use homefix_core::kernel::test_dependencies::MockPaymentGateway;
use homefix_core::server::build_app;
use serde_json::Value;
use std::net::SocketAddr;
use test_context::test_context;
use tower::ServiceExt;

fn app(ctx: &TestHarness) -> Router {
    build_app(ctx.deps.clone(), ctx.deps.jwt_service.clone(), Vec::new()).unwrap()
}

fn token_for(ctx: &TestHarness, profile: &Profile) -> String {
    ctx.deps
        .jwt_service
        .create_token(profile.id, profile.phone_number.clone(), profile.role)
        .unwrap()
}

fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

async fn send(app: Router, builder: axum::http::request::Builder, body: Body) -> (StatusCode, Value) {
    let mut request = builder.body(body).unwrap();
    let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get_as(ctx: &TestHarness, uri: &str, profile: Option<&Profile>) -> (StatusCode, Value) {
    let mut builder = request("GET", uri);
    if let Some(profile) = profile {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(ctx, profile)));
    }
    send(app(ctx), builder, Body::empty()).await
}

// ============================================================================
// Role guard
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_route_requires_session(ctx: &TestHarness) {
    let (status, body) = get_as(ctx, "/api/admin/stats", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_route_refuses_customer(ctx: &TestHarness) {
    let customer = fixtures::customer(ctx).await;

    let (status, body) = get_as(ctx, "/api/admin/stats", Some(&customer)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_reaches_every_dashboard(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;

    for uri in ["/api/admin/stats", "/api/customer/bookings", "/api/professional/bookings"] {
        let (status, _) = get_as(ctx, uri, Some(&admin)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_professional_cannot_open_customer_dashboard(ctx: &TestHarness) {
    let pro = fixtures::profile(ctx, Role::Professional).await;

    let (status, _) = get_as(ctx, "/api/customer/bookings", Some(&pro)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get_as(ctx, "/api/professional/bookings", Some(&pro)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_guard_uses_stored_role(ctx: &TestHarness) {
    // Token still says customer, profile was promoted since
    let customer = fixtures::customer(ctx).await;
    let token = token_for(ctx, &customer);
    Profile::set_role(customer.id, Role::Admin, &ctx.db_pool)
        .await
        .unwrap();

    let builder = request("GET", "/api/admin/stats")
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    let (status, _) = send(app(ctx), builder, Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_garbage_token_is_treated_as_anonymous(ctx: &TestHarness) {
    let builder = request("GET", "/api/customer/bookings")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt");

    let (status, _) = send(app(ctx), builder, Body::empty()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Webhook
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_webhook_requires_signature(ctx: &TestHarness) {
    let builder = request("POST", "/api/payments/webhook")
        .header(header::CONTENT_TYPE, "application/json");

    let (status, body) = send(app(ctx), builder, Body::from(r#"{"event":"payment.captured"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_webhook_acknowledges_unhandled_event_once(ctx: &TestHarness) {
    let payload = br#"{"event":"payment.authorized","payload":{}}"#;
    let signature = MockPaymentGateway::sign_webhook(payload);
    let event_id = format!("evt_{}", random_phone().trim_start_matches('+'));

    let deliver = || {
        request("POST", "/api/payments/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-razorpay-signature", signature.as_str())
            .header("x-razorpay-event-id", event_id.as_str())
    };

    let (status, body) = send(app(ctx), deliver(), Body::from(payload.as_slice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");

    let (status, body) = send(app(ctx), deliver(), Body::from(payload.as_slice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "duplicate");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_health_reports_database(ctx: &TestHarness) {
    let (status, body) = send(app(ctx), request("GET", "/health"), Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}
