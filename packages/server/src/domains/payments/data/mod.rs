use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use crate::domains::catalog::data::decimal_to_f64;
use crate::domains::payments::models::{Payment, PaymentStatus};

/// Payment state as shown to the booking's customer and to admins.
/// Gateway ids are omitted.
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Payment")]
pub struct PaymentData {
    pub id: String,
    pub booking_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub failure_reason: Option<String>,
    pub refund_amount: Option<f64>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentData {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.to_string(),
            booking_id: p.booking_id.to_string(),
            amount: decimal_to_f64(p.amount),
            currency: p.currency,
            status: p.status,
            failure_reason: p.failure_reason,
            refund_amount: p.refund_amount.map(decimal_to_f64),
            refunded_at: p.refunded_at,
            paid_at: p.paid_at,
            updated_at: p.updated_at,
        }
    }
}
