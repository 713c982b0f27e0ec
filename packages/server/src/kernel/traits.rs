// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseSmsService)

use anyhow::Result;
use async_trait::async_trait;
use razorpay::models::{Order, PaymentEntity, RefundEntity};

use crate::common::BookingId;

// =============================================================================
// SMS Trait (Infrastructure - OTP delivery and notifications)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Deliver a text message to an E.164 phone number
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Payment Gateway Trait (Infrastructure - orders, captures, refunds)
// =============================================================================

/// Amounts crossing this trait are integer minor units.
#[async_trait]
pub trait BasePaymentGateway: Send + Sync {
    /// Public key id for the client-side checkout
    fn key_id(&self) -> &str;

    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        booking_id: BookingId,
    ) -> Result<Order>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentEntity>;

    /// `amount_minor = None` refunds the full captured amount
    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
        reason: &str,
    ) -> Result<RefundEntity>;

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool;
}
