//! Shared reconciliation step: captured payment -> paid row + confirmed
//! booking, committed together.

use tracing::{info, warn};

use crate::common::AppResult;
use crate::domains::bookings::actions::notify_status_change;
use crate::domains::bookings::models::{Booking, BookingStatus, TransitionDetails};
use crate::domains::notifications::{kinds, notify};
use crate::domains::payments::models::Payment;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone)]
pub struct Settlement {
    pub payment: Payment,
    pub booking: Option<Booking>,
    /// False when an earlier call (client verify or webhook) got there first.
    pub newly_paid: bool,
}

pub(crate) async fn settle_payment(
    gateway_order_id: &str,
    gateway_payment_id: &str,
    deps: &ServerDeps,
) -> AppResult<Option<Settlement>> {
    let mut tx = deps.db_pool.begin().await?;

    let Some(payment) = Payment::mark_paid(gateway_order_id, gateway_payment_id, &mut *tx).await? else {
        tx.rollback().await?;
        return Ok(Payment::find_by_order_id(gateway_order_id, &deps.db_pool)
            .await?
            .map(|payment| Settlement {
                payment,
                booking: None,
                newly_paid: false,
            }));
    };

    let booking = match Booking::find_by_id(payment.booking_id, &mut *tx).await? {
        Some(b) if b.status == BookingStatus::Pending => Booking::transition(
            b.id,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            TransitionDetails::default(),
            &mut *tx,
        )
        .await?,
        Some(b) => {
            // Captured after the booking left `pending` (e.g. the stale
            // sweep cancelled it). The money is recorded; an admin refunds.
            warn!(
                booking_id = %b.id,
                status = %b.status,
                order_id = gateway_order_id,
                "Payment captured for a booking that is no longer pending"
            );
            None
        }
        None => None,
    };

    tx.commit().await?;

    info!(
        booking_id = %payment.booking_id,
        order_id = gateway_order_id,
        payment_id = gateway_payment_id,
        "Payment settled"
    );

    notify(
        payment.customer_id,
        kinds::PAYMENT_RECEIVED,
        "Payment received",
        &format!("We received {} {}.", payment.amount, payment.currency),
        deps,
    )
    .await;
    if let Some(b) = &booking {
        notify_status_change(b, deps).await;
    }

    Ok(Some(Settlement {
        payment,
        booking,
        newly_paid: true,
    }))
}
