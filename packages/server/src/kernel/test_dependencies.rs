// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use razorpay::models::{Order, PaymentEntity, RefundEntity};
use razorpay::signature;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BasePaymentGateway, BaseSmsService, ServerDeps};
use crate::common::BookingId;
use crate::domains::auth::models::OtpPolicy;
use crate::domains::auth::JwtService;

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";
pub const TEST_JWT_ISSUER: &str = "homefix-test";
pub const TEST_KEY_SECRET: &str = "test_key_secret";
pub const TEST_WEBHOOK_SECRET: &str = "test_webhook_secret";

// =============================================================================
// Mock SMS Service
// =============================================================================

pub struct MockSmsService {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Every send returns an error
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Get all (phone, body) pairs that were sent
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Most recent message body sent to `phone`
    pub fn last_message_to(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, body)| body.clone())
    }

    /// Pull the 6-digit code out of the last OTP message to `phone`
    pub fn last_code_to(&self, phone: &str) -> Option<String> {
        self.last_message_to(phone)
            .and_then(|body| body.split_whitespace().next().map(str::to_string))
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("SMS provider unavailable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone_number.to_string(), body.to_string()));
        Ok(())
    }
}

// =============================================================================
// Mock Payment Gateway
// =============================================================================

/// In-memory gateway. Signatures use the real HMAC scheme with fixed test
/// secrets, so callers can sign with [`MockPaymentGateway::sign_payment`].
pub struct MockPaymentGateway {
    orders: Arc<Mutex<Vec<Order>>>,
    payments: Arc<Mutex<HashMap<String, PaymentEntity>>>,
    refunds: Arc<Mutex<Vec<RefundEntity>>>,
    fail_orders: bool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(Mutex::new(Vec::new())),
            payments: Arc::new(Mutex::new(HashMap::new())),
            refunds: Arc::new(Mutex::new(Vec::new())),
            fail_orders: false,
        }
    }

    /// Order creation returns an error
    pub fn failing_orders() -> Self {
        Self {
            fail_orders: true,
            ..Self::new()
        }
    }

    /// Register a payment the gateway will report for `fetch_payment`
    pub fn add_payment(&self, payment_id: &str, order_id: &str, amount_minor: i64, status: &str) {
        let payment = PaymentEntity {
            id: payment_id.to_string(),
            amount: amount_minor,
            currency: "INR".to_string(),
            status: status.to_string(),
            order_id: Some(order_id.to_string()),
            method: Some("upi".to_string()),
            error_description: None,
            notes: serde_json::Value::Null,
        };
        self.payments
            .lock()
            .unwrap()
            .insert(payment_id.to_string(), payment);
    }

    pub fn sign_payment(order_id: &str, payment_id: &str) -> String {
        signature::sign_payment(order_id, payment_id, TEST_KEY_SECRET)
    }

    pub fn sign_webhook(body: &[u8]) -> String {
        signature::sign(TEST_WEBHOOK_SECRET, body)
    }

    pub fn created_orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    pub fn issued_refunds(&self) -> Vec<RefundEntity> {
        self.refunds.lock().unwrap().clone()
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePaymentGateway for MockPaymentGateway {
    fn key_id(&self) -> &str {
        "rzp_test_key"
    }

    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        booking_id: BookingId,
    ) -> Result<Order> {
        if self.fail_orders {
            anyhow::bail!("gateway unavailable");
        }
        let mut orders = self.orders.lock().unwrap();
        let order = Order {
            id: format!("order_test_{}", uuid::Uuid::new_v4().simple()),
            amount: amount_minor,
            amount_paid: 0,
            currency: currency.to_string(),
            receipt: Some(booking_id.to_string()),
            status: "created".to_string(),
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentEntity> {
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("payment {} not found", payment_id))
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
        _reason: &str,
    ) -> Result<RefundEntity> {
        let captured = self.fetch_payment(payment_id).await?;
        let mut refunds = self.refunds.lock().unwrap();
        let refund = RefundEntity {
            id: format!("rfnd_test_{}", uuid::Uuid::new_v4().simple()),
            payment_id: payment_id.to_string(),
            amount: amount_minor.unwrap_or(captured.amount),
            currency: captured.currency,
            status: "processed".to_string(),
        };
        refunds.push(refund.clone());
        Ok(refund)
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature::verify_payment_signature(order_id, payment_id, signature, TEST_KEY_SECRET)
    }

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        signature::verify_webhook_signature(body, signature, TEST_WEBHOOK_SECRET)
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub sms: Arc<MockSmsService>,
    pub payment_gateway: Arc<MockPaymentGateway>,
    pub admin_identifiers: Vec<String>,
    pub test_identifier_enabled: bool,
    pub otp_policy: OtpPolicy,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            sms: Arc::new(MockSmsService::new()),
            payment_gateway: Arc::new(MockPaymentGateway::new()),
            admin_identifiers: Vec::new(),
            test_identifier_enabled: false,
            otp_policy: OtpPolicy::default(),
        }
    }

    /// Set a mock SMS service
    pub fn mock_sms(mut self, sms: MockSmsService) -> Self {
        self.sms = Arc::new(sms);
        self
    }

    /// Set a mock payment gateway
    pub fn mock_gateway(mut self, gateway: MockPaymentGateway) -> Self {
        self.payment_gateway = Arc::new(gateway);
        self
    }

    pub fn admin_phone(mut self, phone: &str) -> Self {
        self.admin_identifiers.push(phone.to_string());
        self
    }

    pub fn otp_policy(mut self, policy: OtpPolicy) -> Self {
        self.otp_policy = policy;
        self
    }

    pub fn jwt_service() -> JwtService {
        JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self, db_pool: PgPool) -> ServerDeps {
        ServerDeps::builder()
            .db_pool(db_pool)
            .sms(self.sms)
            .payment_gateway(self.payment_gateway)
            .jwt_service(Arc::new(Self::jwt_service()))
            .otp_policy(self.otp_policy)
            .admin_identifiers(self.admin_identifiers)
            .test_identifier_enabled(self.test_identifier_enabled)
            .build()
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_signatures_round_trip() {
        let gateway = MockPaymentGateway::new();
        let sig = MockPaymentGateway::sign_payment("order_1", "pay_1");
        assert!(gateway.verify_payment_signature("order_1", "pay_1", &sig));
        assert!(!gateway.verify_payment_signature("order_1", "pay_2", &sig));

        let body = br#"{"event":"payment.captured"}"#;
        let sig = MockPaymentGateway::sign_webhook(body);
        assert!(gateway.verify_webhook_signature(body, &sig));
    }

    #[tokio::test]
    async fn test_mock_sms_extracts_code() {
        let sms = MockSmsService::new();
        sms.send_sms("+919876543210", "042137 is your HomeFix verification code.")
            .await
            .unwrap();
        assert_eq!(sms.last_code_to("+919876543210").as_deref(), Some("042137"));
        assert!(sms.last_code_to("+910000000000").is_none());
    }

    #[tokio::test]
    async fn test_failing_sms() {
        let sms = MockSmsService::failing();
        assert!(sms.send_sms("+919876543210", "hi").await.is_err());
        assert!(sms.sent_messages().is_empty());
    }
}
