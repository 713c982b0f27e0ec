//! Client-side payment confirmation

use serde::Serialize;
use tracing::{error, info, warn};

use crate::common::money::amounts_match;
use crate::common::{Actor, AppError, AppResult, BookingId, ProfileId};
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::notifications::{kinds, notify};
use crate::domains::payments::actions::orders::{flag_orphan_capture, payment_for_order, OrderPayment};
use crate::domains::payments::actions::settle::settle_payment;
use crate::domains::payments::models::{Payment, PaymentStatus};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize)]
pub struct PaymentConfirmation {
    pub booking_id: BookingId,
    pub payment_status: PaymentStatus,
    pub booking_status: BookingStatus,
}

/// Check the checkout callback and reconcile.
///
/// Repeating a successful verification returns the same confirmation.
pub async fn verify_payment(
    profile_id: ProfileId,
    role: Role,
    order_id: &str,
    payment_id: &str,
    signature: &str,
    deps: &ServerDeps,
) -> AppResult<PaymentConfirmation> {
    Actor::new(profile_id, role)
        .has_role(Role::Customer)
        .check(deps)
        .await?;

    if order_id.is_empty() || payment_id.is_empty() || signature.is_empty() {
        return Err(AppError::validation("order_id, payment_id and signature are required"));
    }

    let payment = match payment_for_order(order_id, deps).await? {
        Some(OrderPayment::Current(p)) if p.customer_id == profile_id => p,
        Some(OrderPayment::PaidElsewhere(paid)) if paid.customer_id == profile_id => {
            // A genuine capture on the replaced order is a second charge.
            if deps
                .payment_gateway
                .verify_payment_signature(order_id, payment_id, signature)
            {
                flag_orphan_capture(order_id, payment_id, &paid, deps).await?;
            }
            return confirmation(paid, deps).await;
        }
        _ => return Err(AppError::NotFound("Payment")),
    };

    if payment.status.is_settled() {
        return confirmation(payment, deps).await;
    }

    if !deps
        .payment_gateway
        .verify_payment_signature(order_id, payment_id, signature)
    {
        warn!(order_id, payment_id, "Payment signature mismatch");
        return Err(fail(&payment, payment_id, "Invalid payment signature", deps).await);
    }

    let gateway_payment = deps
        .payment_gateway
        .fetch_payment(payment_id)
        .await
        .map_err(|e| {
            error!(order_id, payment_id, error = %e, "Fetching gateway payment failed");
            AppError::Upstream("Could not confirm payment with the gateway".to_string())
        })?;

    if gateway_payment.order_id.as_deref() != Some(order_id) {
        return Err(fail(&payment, payment_id, "Payment belongs to a different order", deps).await);
    }
    if !gateway_payment.is_authorized_or_captured() {
        let reason = gateway_payment
            .error_description
            .unwrap_or_else(|| format!("Payment {}", gateway_payment.status));
        return Err(fail(&payment, payment_id, &reason, deps).await);
    }

    let booking = Booking::find_by_id(payment.booking_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;
    if !amounts_match(booking.total_amount, gateway_payment.amount) {
        warn!(
            booking_id = %booking.id,
            expected = %booking.total_amount,
            paid_minor = gateway_payment.amount,
            "Payment amount mismatch"
        );
        return Err(fail(&payment, payment_id, "Paid amount does not match the booking", deps).await);
    }

    let settled = settle_payment(order_id, payment_id, deps)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;
    info!(booking_id = %settled.payment.booking_id, newly_paid = settled.newly_paid, "Payment verified");

    confirmation(settled.payment, deps).await
}

async fn confirmation(payment: Payment, deps: &ServerDeps) -> AppResult<PaymentConfirmation> {
    let booking = Booking::find_by_id(payment.booking_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;
    Ok(PaymentConfirmation {
        booking_id: booking.id,
        payment_status: payment.status,
        booking_status: booking.status,
    })
}

/// Record the failure and build the client error.
async fn fail(payment: &Payment, payment_id: &str, reason: &str, deps: &ServerDeps) -> AppError {
    match Payment::mark_failed(&payment.gateway_order_id, Some(payment_id), reason, &deps.db_pool).await {
        Ok(Some(_)) => {
            notify(
                payment.customer_id,
                kinds::PAYMENT_FAILED,
                "Payment failed",
                &format!("{}. You can retry from your bookings.", reason),
                deps,
            )
            .await;
        }
        Ok(None) => {}
        Err(e) => error!(order_id = %payment.gateway_order_id, error = %e, "Failed to record payment failure"),
    }
    AppError::validation(reason)
}
