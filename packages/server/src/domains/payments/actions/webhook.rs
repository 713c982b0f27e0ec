//! Gateway webhook reconciliation

use razorpay::models::WebhookEvent;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::common::money::{amounts_match, from_minor_units};
use crate::common::{AppError, AppResult};
use crate::domains::bookings::actions::notify_status_change;
use crate::domains::bookings::models::{Booking, BookingStatus, TransitionDetails};
use crate::domains::notifications::{kinds, notify};
use crate::domains::payments::actions::orders::{flag_orphan_capture, payment_for_order, OrderPayment};
use crate::domains::payments::actions::settle::settle_payment;
use crate::domains::payments::models::{Payment, PaymentStatus, WebhookEventLog};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Processed,
    /// Event id seen before
    Duplicate,
    /// Valid but nothing to do (unknown event or order)
    Ignored,
}

/// Verify, dedupe and apply a webhook delivery.
///
/// `event_id` comes from the delivery header; without it the body hash
/// stands in, so byte-identical redeliveries are still caught.
pub async fn handle_webhook(
    body: &[u8],
    signature: &str,
    event_id: Option<&str>,
    deps: &ServerDeps,
) -> AppResult<WebhookOutcome> {
    if signature.is_empty() || !deps.payment_gateway.verify_webhook_signature(body, signature) {
        warn!("Webhook signature mismatch");
        return Err(AppError::validation("Invalid webhook signature"));
    }

    let event: WebhookEvent = serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Malformed webhook body: {}", e)))?;

    let event_id = match event_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => format!("body:{}", hex::encode(Sha256::digest(body))),
    };

    if WebhookEventLog::exists(&event_id, &deps.db_pool).await? {
        debug!(event_id = %event_id, event = %event.event, "Duplicate webhook ignored");
        return Ok(WebhookOutcome::Duplicate);
    }

    let outcome = match event.event.as_str() {
        "payment.captured" | "order.paid" => on_captured(&event, deps).await?,
        "payment.failed" => on_failed(&event, deps).await?,
        "refund.processed" => on_refunded(&event, deps).await?,
        other => {
            debug!(event = other, "Unhandled webhook event acknowledged");
            WebhookOutcome::Ignored
        }
    };

    // Recorded after processing so a failed attempt is retried by the
    // gateway; the handlers themselves are idempotent.
    WebhookEventLog::record(&event_id, &event.event, &deps.db_pool).await?;
    info!(event_id = %event_id, event = %event.event, ?outcome, "Webhook handled");
    Ok(outcome)
}

async fn on_captured(event: &WebhookEvent, deps: &ServerDeps) -> AppResult<WebhookOutcome> {
    let Some(gateway_payment) = event.payload.payment.as_ref().map(|w| &w.entity) else {
        warn!(event = %event.event, "Capture event without a payment entity");
        return Ok(WebhookOutcome::Ignored);
    };
    let Some(order_id) = gateway_payment
        .order_id
        .as_deref()
        .or_else(|| event.payload.order.as_ref().map(|w| w.entity.id.as_str()))
    else {
        return Ok(WebhookOutcome::Ignored);
    };

    let payment = match payment_for_order(order_id, deps).await? {
        Some(OrderPayment::Current(payment)) => payment,
        Some(OrderPayment::PaidElsewhere(paid)) => {
            flag_orphan_capture(order_id, &gateway_payment.id, &paid, deps).await?;
            return Ok(WebhookOutcome::Processed);
        }
        None => {
            warn!(order_id, "Capture for an unknown order");
            return Ok(WebhookOutcome::Ignored);
        }
    };
    if payment.status.is_settled() {
        return Ok(WebhookOutcome::Processed);
    }

    if !amounts_match(payment.amount, gateway_payment.amount) {
        warn!(
            order_id,
            expected = %payment.amount,
            paid = %from_minor_units(gateway_payment.amount),
            "Captured amount does not match the booking"
        );
        Payment::mark_failed(
            order_id,
            Some(&gateway_payment.id),
            "Captured amount does not match the booking",
            &deps.db_pool,
        )
        .await?;
        return Ok(WebhookOutcome::Processed);
    }

    settle_payment(order_id, &gateway_payment.id, deps).await?;
    Ok(WebhookOutcome::Processed)
}

async fn on_failed(event: &WebhookEvent, deps: &ServerDeps) -> AppResult<WebhookOutcome> {
    let Some(gateway_payment) = event.payload.payment.as_ref().map(|w| &w.entity) else {
        return Ok(WebhookOutcome::Ignored);
    };
    let Some(order_id) = gateway_payment.order_id.as_deref() else {
        return Ok(WebhookOutcome::Ignored);
    };

    let reason = gateway_payment
        .error_description
        .clone()
        .unwrap_or_else(|| "Payment failed at the gateway".to_string());

    match Payment::mark_failed(order_id, Some(&gateway_payment.id), &reason, &deps.db_pool).await? {
        Some(payment) => {
            info!(order_id, booking_id = %payment.booking_id, "Payment marked failed");
            notify(
                payment.customer_id,
                kinds::PAYMENT_FAILED,
                "Payment failed",
                &format!("{}. You can retry from your bookings.", reason),
                deps,
            )
            .await;
            Ok(WebhookOutcome::Processed)
        }
        // Unknown order, or already settled: never downgrade a paid payment.
        None => Ok(WebhookOutcome::Ignored),
    }
}

async fn on_refunded(event: &WebhookEvent, deps: &ServerDeps) -> AppResult<WebhookOutcome> {
    let Some(refund) = event.payload.refund.as_ref().map(|w| &w.entity) else {
        return Ok(WebhookOutcome::Ignored);
    };
    let Some(payment) = Payment::find_by_gateway_payment_id(&refund.payment_id, &deps.db_pool).await? else {
        warn!(payment_id = %refund.payment_id, "Refund for an unknown payment");
        return Ok(WebhookOutcome::Ignored);
    };
    if payment.status != PaymentStatus::Paid {
        // Refunds issued from the admin flow are already recorded.
        return Ok(WebhookOutcome::Processed);
    }

    let mut tx = deps.db_pool.begin().await?;
    let updated = Payment::mark_refunded(
        payment.id,
        &refund.id,
        from_minor_units(refund.amount),
        &mut *tx,
    )
    .await?;
    let current = Booking::find_by_id(payment.booking_id, &mut *tx).await?;
    let booking = match (updated.as_ref(), current) {
        (Some(_), Some(b)) if b.status.can_transition_to(BookingStatus::Refunded) => {
            Booking::transition(
                b.id,
                b.status,
                BookingStatus::Refunded,
                TransitionDetails::default(),
                &mut *tx,
            )
            .await?
        }
        _ => None,
    };
    tx.commit().await?;

    if updated.is_some() {
        info!(booking_id = %payment.booking_id, refund_id = %refund.id, "Gateway refund recorded");
        notify(
            payment.customer_id,
            kinds::REFUND_ISSUED,
            "Refund issued",
            &format!(
                "{} {} has been refunded.",
                from_minor_units(refund.amount),
                refund.currency
            ),
            deps,
        )
        .await;
    }
    if let Some(b) = &booking {
        notify_status_change(b, deps).await;
    }
    Ok(WebhookOutcome::Processed)
}
