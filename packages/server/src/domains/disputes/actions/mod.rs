//! Dispute actions

use serde_json::json;
use tracing::{info, warn};

use crate::common::{
    Actor, AppError, AppResult, BookingId, Capability, DisputeId, PageArgs, ProfileId,
};
use crate::domains::admin::models::AdminAction;
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::disputes::models::{Dispute, DisputeStatus};
use crate::domains::notifications::{kinds, notify};
use crate::domains::payments::actions::refund_booking;
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

const MAX_REASON_LEN: usize = 2000;

/// Bookings can be disputed once work has been paid for.
fn is_disputable(status: BookingStatus) -> bool {
    matches!(
        status,
        BookingStatus::Confirmed | BookingStatus::InProgress | BookingStatus::Completed
    )
}

pub async fn raise_dispute(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    reason: &str,
    deps: &ServerDeps,
) -> AppResult<Dispute> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("Describe the problem"));
    }
    if reason.chars().count() > MAX_REASON_LEN {
        return Err(AppError::validation(format!(
            "Reason must be at most {} characters",
            MAX_REASON_LEN
        )));
    }

    let booking = match Booking::find_by_id(booking_id, &deps.db_pool).await? {
        Some(b) if b.is_participant(profile_id) => b,
        _ => return Err(AppError::NotFound("Booking")),
    };
    let required = if booking.customer_id == profile_id {
        Role::Customer
    } else {
        Role::Professional
    };
    Actor::new(profile_id, role).has_role(required).check(deps).await?;

    if !is_disputable(booking.status) {
        return Err(AppError::validation(format!(
            "A {} booking cannot be disputed",
            booking.status
        )));
    }

    let dispute = Dispute::open(booking_id, profile_id, reason, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::conflict("This booking already has an open dispute"))?;

    info!(dispute_id = %dispute.id, booking_id = %booking_id, "Dispute raised");

    let other_party = if booking.customer_id == profile_id {
        booking.professional_id
    } else {
        Some(booking.customer_id)
    };
    if let Some(other) = other_party {
        notify(
            other,
            kinds::DISPUTE_UPDATE,
            "Dispute opened",
            "A dispute was opened on one of your bookings. Our team will review it.",
            deps,
        )
        .await;
    }

    Ok(dispute)
}

/// Disputes on a booking the caller takes part in (or any, for admins).
pub async fn booking_disputes(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    deps: &ServerDeps,
) -> AppResult<Vec<Dispute>> {
    crate::domains::bookings::actions::booking(profile_id, role, booking_id, deps).await?;
    Ok(Dispute::find_for_booking(booking_id, &deps.db_pool).await?)
}

/// Close a dispute. With `refund` the booking is refunded in full first;
/// if the refund fails the dispute stays open.
pub async fn resolve_dispute(
    admin_id: ProfileId,
    admin_role: Role,
    dispute_id: DisputeId,
    resolution: &str,
    refund: bool,
    reject: bool,
    deps: &ServerDeps,
) -> AppResult<Dispute> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ResolveDisputes)
        .check(deps)
        .await?;

    let resolution = resolution.trim();
    if resolution.is_empty() {
        return Err(AppError::validation("A resolution note is required"));
    }
    if refund && reject {
        return Err(AppError::validation("A rejected dispute cannot be refunded"));
    }

    let dispute = Dispute::find_by_id(dispute_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Dispute"))?;
    if dispute.status != DisputeStatus::Open {
        return Err(AppError::conflict("Dispute is already closed"));
    }

    if refund {
        refund_booking(
            admin_id,
            admin_role,
            dispute.booking_id,
            None,
            &format!("Dispute resolution: {}", resolution),
            deps,
        )
        .await?;
    }

    let status = if reject {
        DisputeStatus::Rejected
    } else {
        DisputeStatus::Resolved
    };
    let closed = match Dispute::close(dispute_id, status, resolution, admin_id, &deps.db_pool).await? {
        Some(d) => d,
        None => {
            warn!(dispute_id = %dispute_id, refunded = refund, "Dispute closed concurrently");
            return Err(AppError::conflict("Dispute is already closed"));
        }
    };

    AdminAction::record(
        admin_id,
        if reject { "reject_dispute" } else { "resolve_dispute" },
        "dispute",
        Some(dispute_id.into_uuid()),
        json!({ "booking_id": dispute.booking_id, "refund": refund, "resolution": resolution }),
        &deps.db_pool,
    )
    .await?;

    info!(dispute_id = %dispute_id, status = ?status, refund, "Dispute closed");

    notify(
        dispute.raised_by,
        kinds::DISPUTE_UPDATE,
        if reject { "Dispute rejected" } else { "Dispute resolved" },
        resolution,
        deps,
    )
    .await;

    Ok(closed)
}

pub async fn list_disputes(
    admin_id: ProfileId,
    admin_role: Role,
    status: Option<DisputeStatus>,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Dispute>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ResolveDisputes)
        .check(deps)
        .await?;
    Ok(Dispute::list(status, page, &deps.db_pool).await?)
}
