//! Server dependencies shared by every domain action.
//!
//! External services sit behind `Base*` traits so tests can swap in the
//! mocks from `test_dependencies`.

use anyhow::Result;
use async_trait::async_trait;
use razorpay::models::{Order, PaymentEntity, RefundEntity};
use razorpay::RazorpayClient;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use twilio::TwilioService;
use typed_builder::TypedBuilder;

use crate::common::auth::{HasAuthContext, StoredAccess};
use crate::common::{BookingId, ProfileId};
use crate::domains::auth::models::OtpPolicy;
use crate::domains::auth::JwtService;
use crate::domains::profiles::models::Profile;
use crate::kernel::{BasePaymentGateway, BaseSmsService};

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<()> {
        self.0
            .send_sms(phone_number, body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// RazorpayClient Adapter (implements BasePaymentGateway trait)
// =============================================================================

pub struct RazorpayAdapter(pub Arc<RazorpayClient>);

impl RazorpayAdapter {
    pub fn new(client: Arc<RazorpayClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BasePaymentGateway for RazorpayAdapter {
    fn key_id(&self) -> &str {
        self.0.key_id()
    }

    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        booking_id: BookingId,
    ) -> Result<Order> {
        let receipt = booking_id.to_string();
        let notes = HashMap::from([("booking_id".to_string(), receipt.clone())]);
        self.0
            .create_order(amount_minor, currency, &receipt, notes)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentEntity> {
        self.0
            .fetch_payment(payment_id)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
        reason: &str,
    ) -> Result<RefundEntity> {
        let notes = HashMap::from([("reason".to_string(), reason.to_string())]);
        self.0
            .refund_payment(payment_id, amount_minor, notes)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        self.0.verify_payment_signature(order_id, payment_id, signature)
    }

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        self.0.verify_webhook_signature(body, signature)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone, TypedBuilder)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub sms: Arc<dyn BaseSmsService>,
    pub payment_gateway: Arc<dyn BasePaymentGateway>,
    pub jwt_service: Arc<JwtService>,
    #[builder(default)]
    pub otp_policy: OtpPolicy,
    #[builder(default = "HomeFix".to_string(), setter(into))]
    pub app_name: String,
    #[builder(default = "+91".to_string(), setter(into))]
    pub default_country_code: String,
    #[builder(default = "INR".to_string(), setter(into))]
    pub payment_currency: String,
    /// Phone numbers (E.164) that sign in as admins
    #[builder(default)]
    pub admin_identifiers: Vec<String>,
    #[builder(default)]
    pub test_identifier_enabled: bool,
    /// Also text notifications to the recipient's phone
    #[builder(default)]
    pub sms_notifications_enabled: bool,
}

/// Authorization reads the profile row, never just the token.
#[async_trait]
impl HasAuthContext for ServerDeps {
    async fn stored_access(&self, profile_id: ProfileId) -> Result<Option<StoredAccess>> {
        let access = Profile::find_access(profile_id, &self.db_pool).await?;
        Ok(access.map(|(role, is_active)| StoredAccess { role, is_active }))
    }
}
