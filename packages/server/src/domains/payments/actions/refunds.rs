//! Admin-issued refunds

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgConnection;
use tracing::{error, info, warn};

use crate::common::money::{from_minor_units, to_minor_units};
use crate::common::{Actor, AppError, AppResult, BookingId, Capability, ProfileId};
use crate::domains::admin::models::AdminAction;
use crate::domains::bookings::actions::notify_status_change;
use crate::domains::bookings::models::{Booking, BookingStatus, TransitionDetails};
use crate::domains::notifications::{kinds, notify};
use crate::domains::payments::models::{Payment, PaymentStatus};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

/// Refund a paid booking, in full when `amount` is `None`.
///
/// The gateway call happens first; the payment row, the booking status and
/// the audit entry then commit together.
pub async fn refund_booking(
    admin_id: ProfileId,
    admin_role: Role,
    booking_id: BookingId,
    amount: Option<Decimal>,
    reason: &str,
    deps: &ServerDeps,
) -> AppResult<Payment> {
    Actor::new(admin_id, admin_role)
        .can(Capability::IssueRefunds)
        .check(deps)
        .await?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("A refund reason is required"));
    }

    let booking = Booking::find_by_id(booking_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;
    let payment = Payment::find_by_booking(booking_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    match payment.status {
        PaymentStatus::Paid => {}
        PaymentStatus::Refunded => return Err(AppError::conflict("Booking is already refunded")),
        PaymentStatus::Created | PaymentStatus::Failed => {
            return Err(AppError::conflict("Booking has no captured payment"))
        }
    }
    if !booking.status.can_transition_to(BookingStatus::Refunded) {
        return Err(AppError::conflict(format!(
            "A {} booking cannot be refunded",
            booking.status
        )));
    }
    let Some(gateway_payment_id) = payment.gateway_payment_id.as_deref() else {
        return Err(AppError::conflict("Booking has no captured payment"));
    };

    let refund_amount = amount.unwrap_or(payment.amount);
    if refund_amount <= Decimal::ZERO {
        return Err(AppError::validation("Refund amount must be positive"));
    }
    if refund_amount > payment.amount {
        return Err(AppError::validation(format!(
            "Refund cannot exceed the paid amount of {}",
            payment.amount
        )));
    }
    let refund_minor =
        to_minor_units(refund_amount).map_err(|e| AppError::validation(e.to_string()))?;
    let partial = refund_amount < payment.amount;

    let refund = deps
        .payment_gateway
        .refund(gateway_payment_id, partial.then_some(refund_minor), reason)
        .await
        .map_err(|e| {
            error!(booking_id = %booking_id, error = %e, "Gateway refund failed");
            AppError::Upstream("Refund could not be issued".to_string())
        })?;

    let mut tx = deps.db_pool.begin().await?;
    let updated = Payment::mark_refunded(
        payment.id,
        &refund.id,
        from_minor_units(refund.amount),
        &mut *tx,
    )
    .await?
    .ok_or_else(|| AppError::conflict("Payment changed while refunding"))?;
    let refunded_booking = mark_booking_refunded(booking_id, booking.status, &mut *tx).await?;
    AdminAction::record(
        admin_id,
        "refund_booking",
        "booking",
        Some(booking_id.into_uuid()),
        json!({
            "refund_id": refund.id,
            "amount": from_minor_units(refund.amount),
            "partial": partial,
            "reason": reason,
        }),
        &mut *tx,
    )
    .await?;
    tx.commit().await?;

    info!(
        booking_id = %booking_id,
        refund_id = %refund.id,
        amount_minor = refund.amount,
        "Refund issued"
    );

    notify(
        payment.customer_id,
        kinds::REFUND_ISSUED,
        "Refund issued",
        &format!(
            "{} {} has been refunded to your original payment method.",
            from_minor_units(refund.amount),
            refund.currency
        ),
        deps,
    )
    .await;
    if let Some(b) = &refunded_booking {
        notify_status_change(b, deps).await;
    }

    Ok(updated)
}

/// Move a booking to `Refunded` as part of a refund transaction.
///
/// `read_status` is the status seen before the gateway call. If the booking
/// moved since, the transition is retried from its stored status when the
/// lifecycle allows it. Otherwise the booking is left alone and `None` is
/// returned; the money has already gone back, so the caller still commits.
pub async fn mark_booking_refunded(
    booking_id: BookingId,
    read_status: BookingStatus,
    conn: &mut PgConnection,
) -> AppResult<Option<Booking>> {
    let refunded = Booking::transition(
        booking_id,
        read_status,
        BookingStatus::Refunded,
        TransitionDetails::default(),
        &mut *conn,
    )
    .await?;
    if refunded.is_some() {
        return Ok(refunded);
    }

    let Some(current) = Booking::find_by_id(booking_id, &mut *conn).await? else {
        error!(booking_id = %booking_id, "Refunded booking disappeared");
        return Ok(None);
    };
    if current.status == BookingStatus::Refunded {
        return Ok(None);
    }
    if !current.status.can_transition_to(BookingStatus::Refunded) {
        error!(
            booking_id = %booking_id,
            status = %current.status,
            "Refund issued but booking cannot move to refunded"
        );
        return Ok(None);
    }

    warn!(
        booking_id = %booking_id,
        from = %read_status,
        to = %current.status,
        "Booking changed during refund"
    );
    let refunded = Booking::transition(
        booking_id,
        current.status,
        BookingStatus::Refunded,
        TransitionDetails::default(),
        &mut *conn,
    )
    .await?;
    if refunded.is_none() {
        error!(booking_id = %booking_id, "Refund issued but booking status kept changing");
    }
    Ok(refunded)
}
