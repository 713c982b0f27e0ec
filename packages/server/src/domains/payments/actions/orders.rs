//! Resolving a gateway order to its payment, including orders a checkout
//! retry has since replaced.

use tracing::{error, info};

use crate::common::AppResult;
use crate::domains::payments::models::{Payment, PaymentOrder};
use crate::kernel::ServerDeps;

#[derive(Debug)]
pub(crate) enum OrderPayment {
    /// The payment row tracks this order (re-pointed to it if it had been
    /// superseded while unsettled).
    Current(Payment),
    /// The booking was already paid through a different order.
    PaidElsewhere(Payment),
}

pub(crate) async fn payment_for_order(
    order_id: &str,
    deps: &ServerDeps,
) -> AppResult<Option<OrderPayment>> {
    if let Some(payment) = Payment::find_by_order_id(order_id, &deps.db_pool).await? {
        return Ok(Some(OrderPayment::Current(payment)));
    }

    let Some(order) = PaymentOrder::find(order_id, &deps.db_pool).await? else {
        return Ok(None);
    };

    if let Some(payment) = Payment::adopt_order(order.booking_id, order_id, &deps.db_pool).await? {
        info!(booking_id = %order.booking_id, order_id, "Resuming superseded gateway order");
        return Ok(Some(OrderPayment::Current(payment)));
    }

    Ok(Payment::find_by_booking(order.booking_id, &deps.db_pool)
        .await?
        .map(|payment| {
            if payment.gateway_order_id == order_id {
                OrderPayment::Current(payment)
            } else {
                OrderPayment::PaidElsewhere(payment)
            }
        }))
}

/// Money captured on an old order after the booking was paid through
/// another one. Recorded for an admin refund.
pub(crate) async fn flag_orphan_capture(
    order_id: &str,
    gateway_payment_id: &str,
    paid: &Payment,
    deps: &ServerDeps,
) -> AppResult<()> {
    error!(
        booking_id = %paid.booking_id,
        order_id,
        payment_id = gateway_payment_id,
        paid_order_id = %paid.gateway_order_id,
        "Second capture for an already paid booking, refund required"
    );
    PaymentOrder::flag_orphan_capture(order_id, gateway_payment_id, &deps.db_pool).await?;
    Ok(())
}
