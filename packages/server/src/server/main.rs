// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use homefix_core::domains::auth::JwtService;
use homefix_core::kernel::{start_scheduler, RazorpayAdapter, ServerDeps, TwilioAdapter};
use homefix_core::{server::build_app, Config};
use razorpay::{RazorpayClient, RazorpayOptions};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twilio::{TwilioOptions, TwilioService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,homefix_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HomeFix API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // External services
    let twilio = Arc::new(TwilioService::new(TwilioOptions {
        account_sid: config.twilio_account_sid.clone(),
        auth_token: config.twilio_auth_token.clone(),
        from: config.twilio_from_number.clone(),
    }));
    let razorpay = Arc::new(RazorpayClient::new(RazorpayOptions {
        key_id: config.razorpay_key_id.clone(),
        key_secret: config.razorpay_key_secret.clone(),
        webhook_secret: config.razorpay_webhook_secret.clone(),
    }));
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    if config.test_identifier_enabled && !cfg!(debug_assertions) {
        tracing::warn!("TEST_IDENTIFIER_ENABLED is ignored in release builds");
    }

    let deps = Arc::new(
        ServerDeps::builder()
            .db_pool(pool)
            .sms(Arc::new(TwilioAdapter::new(twilio)))
            .payment_gateway(Arc::new(RazorpayAdapter::new(razorpay)))
            .jwt_service(jwt_service.clone())
            .otp_policy(config.otp_policy)
            .app_name(config.app_name.clone())
            .default_country_code(config.default_country_code.clone())
            .payment_currency(config.payment_currency.clone())
            .admin_identifiers(config.admin_phone_numbers.clone())
            .test_identifier_enabled(config.test_identifier_enabled && cfg!(debug_assertions))
            .sms_notifications_enabled(config.sms_notifications_enabled)
            .build(),
    );

    // Keep the scheduler handle alive for the life of the server
    let _scheduler = start_scheduler(deps.clone(), config.pending_booking_ttl_hours)
        .await
        .context("Failed to start scheduled tasks")?;

    // Build application
    let app = build_app(deps, jwt_service, config.allowed_origins.clone())?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("GraphQL endpoint: http://localhost:{}/graphql", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
