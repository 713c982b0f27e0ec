//! Payment gateway endpoints: checkout order, client verification and the
//! server-to-server webhook.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::{AppError, AppResult, BookingId};
use crate::domains::payments::actions::{
    create_order, handle_webhook, verify_payment, CheckoutOrder, PaymentConfirmation,
    WebhookOutcome,
};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";
pub const EVENT_ID_HEADER: &str = "x-razorpay-event-id";

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub booking_id: BookingId,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

/// POST /api/payments/create-order
pub async fn create_order_handler(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> AppResult<Json<CheckoutOrder>> {
    let order = create_order(user.profile_id, user.role, request.booking_id, &deps).await?;
    Ok(Json(order))
}

/// POST /api/payments/verify
pub async fn verify_payment_handler(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> AppResult<Json<PaymentConfirmation>> {
    let confirmation = verify_payment(
        user.profile_id,
        user.role,
        request.order_id.trim(),
        request.payment_id.trim(),
        request.signature.trim(),
        &deps,
    )
    .await?;
    Ok(Json(confirmation))
}

/// POST /api/payments/webhook
///
/// Takes the raw body: the signature covers the exact bytes sent.
pub async fn webhook_handler(
    State(deps): State<Arc<ServerDeps>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = header(&headers, SIGNATURE_HEADER)
        .ok_or_else(|| AppError::validation("Missing webhook signature"))?;
    let event_id = header(&headers, EVENT_ID_HEADER);

    let outcome = handle_webhook(&body, signature, event_id, &deps).await?;
    Ok(Json(WebhookAck {
        status: match outcome {
            WebhookOutcome::Processed => "processed",
            WebhookOutcome::Duplicate => "duplicate",
            WebhookOutcome::Ignored => "ignored",
        },
    }))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
