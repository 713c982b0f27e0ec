//! Gateway order creation for a pending booking

use serde::Serialize;
use tracing::{error, info};

use crate::common::money::to_minor_units;
use crate::common::{Actor, AppError, AppResult, BookingId, ProfileId};
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::payments::models::{Payment, PaymentOrder, PaymentStatus};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

/// Everything the client-side checkout needs to open the gateway widget.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOrder {
    pub key_id: String,
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub booking_id: BookingId,
    pub name: String,
}

pub async fn create_order(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    deps: &ServerDeps,
) -> AppResult<CheckoutOrder> {
    Actor::new(profile_id, role)
        .has_role(Role::Customer)
        .check(deps)
        .await?;

    let booking = match Booking::find_by_id(booking_id, &deps.db_pool).await? {
        Some(b) if b.customer_id == profile_id => b,
        _ => return Err(AppError::NotFound("Booking")),
    };
    if booking.status != BookingStatus::Pending {
        return Err(AppError::conflict(format!(
            "Booking is {} and cannot be paid",
            booking.status
        )));
    }

    let amount_minor = to_minor_units(booking.total_amount)?;
    if amount_minor <= 0 {
        return Err(AppError::validation("Booking has nothing to pay"));
    }

    let existing = Payment::find_by_booking(booking_id, &deps.db_pool).await?;
    match &existing {
        Some(p) if p.status.is_settled() => {
            return Err(AppError::conflict("Booking is already paid"));
        }
        Some(p)
            if p.status == PaymentStatus::Created
                && p.amount == booking.total_amount
                && p.currency == booking.currency =>
        {
            info!(booking_id = %booking_id, order_id = %p.gateway_order_id, "Reusing gateway order");
            return Ok(checkout(p, amount_minor, deps));
        }
        _ => {}
    }

    let order = deps
        .payment_gateway
        .create_order(amount_minor, &booking.currency, booking_id)
        .await
        .map_err(|e| {
            error!(booking_id = %booking_id, error = %e, "Gateway order creation failed");
            AppError::Upstream("Could not start payment. Please try again.".to_string())
        })?;

    let mut tx = deps.db_pool.begin().await?;
    let Some(payment) = Payment::upsert_order(
        booking_id,
        profile_id,
        &order.id,
        booking.total_amount,
        &booking.currency,
        &mut *tx,
    )
    .await?
    else {
        tx.rollback().await?;
        return Err(AppError::conflict("Booking is already paid"));
    };
    // Kept after a retry replaces the order on the payment row
    PaymentOrder::record(&order.id, payment.id, booking_id, booking.total_amount, &mut *tx).await?;
    tx.commit().await?;

    info!(
        booking_id = %booking_id,
        order_id = %order.id,
        amount_minor,
        "Gateway order created"
    );
    Ok(checkout(&payment, amount_minor, deps))
}

fn checkout(payment: &Payment, amount_minor: i64, deps: &ServerDeps) -> CheckoutOrder {
    CheckoutOrder {
        key_id: deps.payment_gateway.key_id().to_string(),
        order_id: payment.gateway_order_id.clone(),
        amount_minor,
        currency: payment.currency.clone(),
        booking_id: payment.booking_id,
        name: deps.app_name.clone(),
    }
}

/// Payment state for a booking the caller can see.
pub async fn booking_payment(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    deps: &ServerDeps,
) -> AppResult<Option<Payment>> {
    crate::domains::bookings::actions::booking(profile_id, role, booking_id, deps).await?;
    Ok(Payment::find_by_booking(booking_id, &deps.db_pool).await?)
}
