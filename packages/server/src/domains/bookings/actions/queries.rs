//! Booking reads

use crate::common::{Actor, AppError, AppResult, BookingId, Capability, PageArgs, ProfileId};
use crate::domains::bookings::actions::lifecycle::authorize_participant_or_admin;
use crate::domains::bookings::models::{Booking, BookingStatus, BookingView};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

/// Bookings the caller takes part in: as the customer, or as the assigned
/// professional when they are one.
pub async fn my_bookings(
    profile_id: ProfileId,
    role: Role,
    status: Option<BookingStatus>,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Booking>> {
    let view = match role {
        Role::Professional => BookingView::Professional(profile_id),
        Role::Customer | Role::Admin => BookingView::Customer(profile_id),
    };
    Ok(Booking::list_for(view, status, page, &deps.db_pool).await?)
}

pub async fn booking(
    profile_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    deps: &ServerDeps,
) -> AppResult<Booking> {
    let booking = Booking::find_by_id(booking_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;
    authorize_participant_or_admin(&booking, profile_id, role, deps).await?;
    Ok(booking)
}

pub async fn list_bookings(
    admin_id: ProfileId,
    admin_role: Role,
    status: Option<BookingStatus>,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Booking>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageBookings)
        .check(deps)
        .await?;
    Ok(Booking::list(status, page, &deps.db_pool).await?)
}
