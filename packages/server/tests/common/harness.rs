//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary. Migrations
//! run once; tests isolate themselves with fresh phone numbers and slugs.

use anyhow::{Context, Result};
use homefix_core::kernel::test_dependencies::{MockPaymentGateway, MockSmsService};
use homefix_core::kernel::{ServerDeps, TestDependencies};
use homefix_core::server::middleware::AuthUser;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::GraphQLClient;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: a fresh pool plus mock SMS and gateway.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let customer = fixtures::customer(ctx).await;
///     // ...
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub sms: Arc<MockSmsService>,
    pub gateway: Arc<MockPaymentGateway>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        Self::with_dependencies(TestDependencies::new()).await
    }

    /// Build a harness around custom test dependencies (admin list, OTP
    /// policy). The mocks in `test_deps` stay reachable through the harness.
    pub async fn with_dependencies(test_deps: TestDependencies) -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let sms = test_deps.sms.clone();
        let gateway = test_deps.payment_gateway.clone();
        let deps = Arc::new(test_deps.into_deps(db_pool.clone()));

        Ok(Self {
            db_pool,
            deps,
            sms,
            gateway,
        })
    }

    /// Anonymous GraphQL client.
    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(self.deps.clone(), None)
    }

    /// GraphQL client acting as `user`.
    pub fn graphql_as(&self, user: &AuthUser) -> GraphQLClient {
        GraphQLClient::new(self.deps.clone(), Some(user.clone()))
    }
}
