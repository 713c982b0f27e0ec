use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /v1/orders`. `amount` is in minor units (paise).
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub notes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub notes: serde_json::Value,
}

impl PaymentEntity {
    /// Money has actually moved (auto-capture or manual capture).
    pub fn is_captured(&self) -> bool {
        self.status == "captured"
    }

    pub fn is_authorized_or_captured(&self) -> bool {
        matches!(self.status.as_str(), "authorized" | "captured")
    }

    /// Booking id carried in the order/payment notes, if any.
    pub fn booking_note(&self) -> Option<&str> {
        self.notes.get("booking_id").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRefundRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub notes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundEntity {
    pub id: String,
    pub payment_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

/// Webhook envelope. Only the entities the server reconciles are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment: Option<EntityWrapper<PaymentEntity>>,
    #[serde(default)]
    pub refund: Option<EntityWrapper<RefundEntity>>,
    #[serde(default)]
    pub order: Option<EntityWrapper<Order>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payment_captured_webhook() {
        let raw = r#"{
            "entity": "event",
            "event": "payment.captured",
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_1",
                        "amount": 49900,
                        "currency": "INR",
                        "status": "captured",
                        "order_id": "order_1",
                        "method": "upi",
                        "notes": {"booking_id": "0190b2f4-0000-7000-8000-000000000000"}
                    }
                }
            },
            "created_at": 1700000000
        }"#;
        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event, "payment.captured");
        let payment = event.payload.payment.unwrap().entity;
        assert!(payment.is_captured());
        assert_eq!(payment.amount, 49900);
        assert_eq!(
            payment.booking_note(),
            Some("0190b2f4-0000-7000-8000-000000000000")
        );
    }

    #[test]
    fn test_event_without_payload_parses() {
        let event: WebhookEvent = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert!(event.payload.payment.is_none());
        assert!(event.payload.refund.is_none());
    }

    #[test]
    fn test_notes_as_empty_array() {
        // the gateway sends `[]` instead of `{}` for empty notes
        let payment: PaymentEntity = serde_json::from_str(
            r#"{"id":"pay_1","amount":100,"currency":"INR","status":"failed","notes":[]}"#,
        )
        .unwrap();
        assert_eq!(payment.booking_note(), None);
        assert!(!payment.is_authorized_or_captured());
    }
}
