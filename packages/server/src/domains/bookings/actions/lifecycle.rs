//! Booking creation and status changes

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::common::{
    Actor, AppError, AppResult, BookingId, Capability, ProfileId, ServiceId, SlotId,
};
use crate::domains::admin::models::AdminAction;
use crate::domains::bookings::models::{
    Booking, BookingStatus, NewBooking, TransitionDetails,
};
use crate::domains::catalog::actions::get_service;
use crate::domains::catalog::models::{AvailabilitySlot, ProfessionalService};
use crate::domains::notifications::{kinds, notify};
use crate::domains::profiles::models::{Profile, Role};
use crate::kernel::ServerDeps;

const MAX_ADDRESS_LEN: usize = 500;
const MAX_NOTES_LEN: usize = 1000;
const MAX_REASON_LEN: usize = 500;

/// What a customer submits to book a service.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub service_id: ServiceId,
    pub professional_id: Option<ProfileId>,
    pub slot_id: Option<SlotId>,
    /// Required unless a slot is given, in which case it defaults to the
    /// slot start.
    pub scheduled_at: Option<DateTime<Utc>>,
    pub address: String,
    pub notes: Option<String>,
}

pub async fn create_booking(
    customer_id: ProfileId,
    role: Role,
    request: BookingRequest,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    Actor::new(customer_id, role)
        .has_role(Role::Customer)
        .check(deps)
        .await?;

    let address = request.address.trim().to_string();
    if address.is_empty() {
        return Err(AppError::validation("Address is required"));
    }
    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(AppError::validation(format!(
            "Address must be at most {} characters",
            MAX_ADDRESS_LEN
        )));
    }
    let notes = request
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if notes.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(AppError::validation(format!(
            "Notes must be at most {} characters",
            MAX_NOTES_LEN
        )));
    }

    let service = get_service(request.service_id, deps).await?;

    let slot = match request.slot_id {
        Some(slot_id) => Some(
            AvailabilitySlot::find_by_id(slot_id, &deps.db_pool)
                .await?
                .ok_or(AppError::NotFound("Slot"))?,
        ),
        None => None,
    };

    let professional_id = match (&slot, request.professional_id) {
        (Some(slot), Some(pro)) if slot.professional_id != pro => {
            return Err(AppError::validation(
                "Slot does not belong to the selected professional",
            ))
        }
        (Some(slot), _) => Some(slot.professional_id),
        (None, pro) => pro,
    };

    let scheduled_at = match (&slot, request.scheduled_at) {
        (Some(slot), Some(at)) if at < slot.starts_at || at >= slot.ends_at => {
            return Err(AppError::validation("Scheduled time must fall within the slot"))
        }
        (Some(_), Some(at)) => at,
        (Some(slot), None) => slot.starts_at,
        (None, Some(at)) => at,
        (None, None) => return Err(AppError::validation("Choose a time or a slot")),
    };
    if scheduled_at <= Utc::now() {
        return Err(AppError::validation("Booking must be scheduled in the future"));
    }

    if let Some(pro) = professional_id {
        ensure_bookable_professional(pro, service.id, deps).await?;
    }

    let mut tx = deps.db_pool.begin().await?;

    if let Some(slot) = &slot {
        if AvailabilitySlot::claim(slot.id, slot.professional_id, &mut *tx)
            .await?
            .is_none()
        {
            return Err(AppError::conflict("Slot is no longer available"));
        }
    }

    let booking = Booking::create(
        NewBooking {
            customer_id,
            professional_id,
            service_id: service.id,
            slot_id: slot.as_ref().map(|s| s.id),
            scheduled_at,
            address,
            notes,
            total_amount: service.base_price,
            currency: deps.payment_currency.clone(),
        },
        &mut *tx,
    )
    .await?;

    tx.commit().await?;

    info!(
        booking_id = %booking.id,
        customer_id = %customer_id,
        service_id = %service.id,
        "Booking created"
    );

    notify(
        customer_id,
        kinds::BOOKING_CREATED,
        "Booking received",
        &format!(
            "Your {} booking is reserved. Complete payment to confirm it.",
            service.name
        ),
        deps,
    )
    .await;
    if let Some(pro) = professional_id {
        notify(
            pro,
            kinds::BOOKING_CREATED,
            "New booking",
            &format!("New {} booking on {}.", service.name, scheduled_at.format("%d %b %Y %H:%M UTC")),
            deps,
        )
        .await;
    }

    Ok(booking)
}

/// Professionals must be active, verified and offer the service.
async fn ensure_bookable_professional(
    professional_id: ProfileId,
    service_id: ServiceId,
    deps: &ServerDeps,
) -> AppResult<Profile> {
    let pro = match Profile::find_by_id(professional_id, &deps.db_pool).await? {
        Some(p) if p.role == Role::Professional => p,
        _ => return Err(AppError::NotFound("Professional")),
    };
    if !pro.is_active || !pro.is_verified {
        return Err(AppError::validation("Professional is not available for bookings"));
    }
    if !ProfessionalService::exists(professional_id, service_id, &deps.db_pool).await? {
        return Err(AppError::validation("Professional does not offer this service"));
    }
    Ok(pro)
}

/// Customers cancel their own pending or confirmed bookings, the assigned
/// professional can cancel a booking they cannot attend, admins anything
/// the lifecycle allows.
pub async fn cancel_booking(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    reason: Option<String>,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    let booking = load(booking_id, deps).await?;
    authorize_participant_or_admin(&booking, profile_id, role, deps).await?;

    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if reason.as_ref().is_some_and(|r| r.chars().count() > MAX_REASON_LEN) {
        return Err(AppError::validation(format!(
            "Reason must be at most {} characters",
            MAX_REASON_LEN
        )));
    }

    apply_transition(
        booking,
        BookingStatus::Cancelled,
        TransitionDetails {
            cancellation_reason: reason,
            cancelled_by: Some(profile_id),
        },
        deps,
    )
    .await
}

/// Assigned professional marks a confirmed booking as started.
pub async fn start_booking(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    let booking = load(booking_id, deps).await?;
    authorize_assigned_professional(&booking, profile_id, role, deps).await?;
    apply_transition(booking, BookingStatus::InProgress, TransitionDetails::default(), deps).await
}

pub async fn complete_booking(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    let booking = load(booking_id, deps).await?;
    authorize_assigned_professional(&booking, profile_id, role, deps).await?;
    apply_transition(booking, BookingStatus::Completed, TransitionDetails::default(), deps).await
}

/// Admin override for any transition in the lifecycle table except
/// `refunded`, which only the refund flow may set.
pub async fn transition_booking(
    admin_id: ProfileId,
    admin_role: Role,
    booking_id: BookingId,
    to: BookingStatus,
    reason: Option<String>,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageBookings)
        .check(deps)
        .await?;

    if to == BookingStatus::Refunded {
        return Err(AppError::validation("Use the refund flow to refund a booking"));
    }

    let booking = load(booking_id, deps).await?;
    let from = booking.status;
    let details = if to == BookingStatus::Cancelled {
        TransitionDetails {
            cancellation_reason: reason.clone(),
            cancelled_by: Some(admin_id),
        }
    } else {
        TransitionDetails::default()
    };

    let updated = apply_transition(booking, to, details, deps).await?;

    AdminAction::record(
        admin_id,
        "transition_booking",
        "booking",
        Some(booking_id.into_uuid()),
        json!({ "from": from, "to": to, "reason": reason }),
        &deps.db_pool,
    )
    .await?;

    Ok(updated)
}

pub async fn assign_professional(
    admin_id: ProfileId,
    admin_role: Role,
    booking_id: BookingId,
    professional_id: ProfileId,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageBookings)
        .check(deps)
        .await?;

    let booking = load(booking_id, deps).await?;
    if booking.slot_id.is_some() && booking.professional_id != Some(professional_id) {
        return Err(AppError::conflict(
            "Booking holds another professional's slot; cancel and rebook instead",
        ));
    }
    ensure_bookable_professional(professional_id, booking.service_id, deps).await?;

    let updated = Booking::assign_professional(booking_id, professional_id, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::conflict("Only pending or confirmed bookings can be reassigned"))?;

    AdminAction::record(
        admin_id,
        "assign_professional",
        "booking",
        Some(booking_id.into_uuid()),
        json!({ "from": booking.professional_id, "to": professional_id }),
        &deps.db_pool,
    )
    .await?;

    info!(booking_id = %booking_id, professional_id = %professional_id, "Professional assigned");
    notify(
        professional_id,
        kinds::BOOKING_CREATED,
        "New booking assigned",
        &format!(
            "You have been assigned a booking on {}.",
            updated.scheduled_at.format("%d %b %Y %H:%M UTC")
        ),
        deps,
    )
    .await;

    Ok(updated)
}

/// Validate against the lifecycle table, then apply as a conditional
/// update. Slots are freed in the same transaction when the booking stops
/// holding one.
pub(crate) async fn apply_transition(
    booking: Booking,
    to: BookingStatus,
    details: TransitionDetails,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    let from = booking.status;
    if !from.can_transition_to(to) {
        return Err(AppError::conflict(format!(
            "Booking cannot move from {} to {}",
            from, to
        )));
    }

    let mut tx = deps.db_pool.begin().await?;
    let updated = Booking::transition(booking.id, from, to, details, &mut *tx)
        .await?
        .ok_or_else(|| AppError::conflict("Booking was changed by another request; reload and retry"))?;

    if from.holds_slot() && !to.holds_slot() {
        if let Some(slot_id) = updated.slot_id {
            AvailabilitySlot::release(slot_id, &mut *tx).await?;
        }
    }
    tx.commit().await?;

    info!(booking_id = %updated.id, from = %from, to = %to, "Booking status changed");
    notify_status_change(&updated, deps).await;
    Ok(updated)
}

/// Tell both parties about a new status.
pub(crate) async fn notify_status_change(booking: &Booking, deps: &ServerDeps) {
    let (title, body) = match booking.status {
        BookingStatus::Pending => return,
        BookingStatus::Confirmed => ("Booking confirmed", "Your booking is confirmed."),
        BookingStatus::InProgress => ("Service started", "Your professional has started the job."),
        BookingStatus::Completed => (
            "Service completed",
            "Your booking is complete. Leave a review to help others.",
        ),
        BookingStatus::Cancelled => ("Booking cancelled", "Your booking has been cancelled."),
        BookingStatus::Refunded => ("Booking refunded", "A refund has been issued for your booking."),
    };

    notify(booking.customer_id, kinds::BOOKING_STATUS, title, body, deps).await;
    if let Some(pro) = booking.professional_id {
        let body = format!("Booking {} is now {}.", booking.id, booking.status);
        notify(pro, kinds::BOOKING_STATUS, title, &body, deps).await;
    }
}

async fn load(booking_id: BookingId, deps: &ServerDeps) -> AppResult<Booking> {
    Booking::find_by_id(booking_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Booking"))
}

/// Participants pass after the usual account checks; everyone else needs
/// booking-management rights.
pub(crate) async fn authorize_participant_or_admin(
    booking: &Booking,
    profile_id: ProfileId,
    role: Role,
    deps: &ServerDeps,
) -> AppResult<()> {
    if booking.customer_id == profile_id {
        Actor::new(profile_id, role)
            .has_role(Role::Customer)
            .check(deps)
            .await?;
        return Ok(());
    }
    if booking.professional_id == Some(profile_id) {
        Actor::new(profile_id, role)
            .has_role(Role::Professional)
            .check(deps)
            .await?;
        return Ok(());
    }

    match Actor::new(profile_id, role)
        .can(Capability::ManageBookings)
        .check(deps)
        .await
    {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(booking_id = %booking.id, profile_id = %profile_id, "Booking access denied");
            // Do not reveal that the booking exists.
            match AppError::from(e) {
                AppError::Forbidden(_) => Err(AppError::NotFound("Booking")),
                other => Err(other),
            }
        }
    }
}

async fn authorize_assigned_professional(
    booking: &Booking,
    profile_id: ProfileId,
    role: Role,
    deps: &ServerDeps,
) -> AppResult<()> {
    if booking.professional_id == Some(profile_id) {
        Actor::new(profile_id, role)
            .has_role(Role::Professional)
            .check(deps)
            .await?;
        return Ok(());
    }
    Actor::new(profile_id, role)
        .can(Capability::ManageBookings)
        .check(deps)
        .await?;
    Ok(())
}
