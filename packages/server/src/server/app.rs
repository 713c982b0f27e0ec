//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Extension, Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::{
    extract_client_ip, jwt_auth_middleware, role_guard_middleware, AuthUser,
};
use crate::server::routes::{
    admin_stats_handler, create_order_handler, customer_bookings_handler, graphql_batch_handler,
    graphql_handler, health_handler, professional_bookings_handler, send_otp_handler,
    verify_otp_handler, verify_payment_handler, webhook_handler,
};

#[cfg(debug_assertions)]
use crate::server::routes::graphql_playground;

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    State(deps): State<Arc<ServerDeps>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Populated by jwt_auth_middleware when the bearer token is valid
    let auth_user = request.extensions().get::<AuthUser>().cloned();

    request
        .extensions_mut()
        .insert(GraphQLContext::new(deps, auth_user));

    next.run(request).await
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

/// Build the Axum application router
///
/// OTP and checkout endpoints share a per-IP rate limit. The payment
/// webhook is left out of it: the gateway retries from a small set of
/// addresses and duplicates are absorbed by event dedupe.
pub fn build_app(
    deps: Arc<ServerDeps>,
    jwt_service: Arc<JwtService>,
    allowed_origins: Vec<String>,
) -> Result<Router> {
    // Create GraphQL schema (singleton)
    let schema = Arc::new(create_schema());

    // 10/sec per IP with bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let limited = Router::new()
        .route("/api/auth/otp/send", post(send_otp_handler))
        .route("/api/auth/otp/verify", post(verify_otp_handler))
        .route("/api/payments/create-order", post(create_order_handler))
        .route("/api/payments/verify", post(verify_payment_handler))
        .layer(rate_limit_layer);

    let mut router = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/batch", post(graphql_batch_handler));

    // GraphQL playground only in debug builds
    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(graphql_playground));
    }

    let cors = cors_layer(&allowed_origins)?;
    let jwt_for_middleware = jwt_service.clone();

    let app = router
        .merge(limited)
        .route("/api/payments/webhook", post(webhook_handler))
        // Role-gated dashboards
        .route("/api/customer/bookings", get(customer_bookings_handler))
        .route("/api/professional/bookings", get(professional_bookings_handler))
        .route("/api/admin/stats", get(admin_stats_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn_with_state(
            deps.clone(),
            create_graphql_context,
        ))
        .layer(middleware::from_fn_with_state(
            deps.clone(),
            role_guard_middleware,
        ))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_for_middleware.clone(), req, next)
        }))
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(schema))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(deps);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_accepts_listed_origins() {
        let origins = vec![
            "https://homefix.example".to_string(),
            "http://localhost:3000".to_string(),
        ];
        assert!(cors_layer(&origins).is_ok());
        assert!(cors_layer(&[]).is_ok());
    }

    #[test]
    fn test_cors_rejects_malformed_origin() {
        let origins = vec!["https://bad\norigin".to_string()];
        assert!(cors_layer(&origins).is_err());
    }
}
