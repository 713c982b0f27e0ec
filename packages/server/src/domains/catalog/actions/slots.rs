//! Professional availability

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::common::{Actor, AppError, AppResult, ProfileId, SlotId};
use crate::domains::catalog::models::AvailabilitySlot;
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

/// Longest single slot a professional can publish.
const MAX_SLOT_HOURS: i64 = 12;
/// Widest window a public availability query may span.
const MAX_QUERY_DAYS: i64 = 31;

pub async fn add_slot(
    profile_id: ProfileId,
    role: Role,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    deps: &ServerDeps,
) -> AppResult<AvailabilitySlot> {
    Actor::new(profile_id, role)
        .has_role(Role::Professional)
        .check(deps)
        .await?;

    validate_slot_window(starts_at, ends_at, Utc::now())?;

    if AvailabilitySlot::overlaps_existing(profile_id, starts_at, ends_at, &deps.db_pool).await? {
        return Err(AppError::conflict("Slot overlaps an existing slot"));
    }

    let slot = AvailabilitySlot::create(profile_id, starts_at, ends_at, &deps.db_pool).await?;
    info!(slot_id = %slot.id, profile_id = %profile_id, "Slot added");
    Ok(slot)
}

pub async fn remove_slot(
    profile_id: ProfileId,
    role: Role,
    slot_id: SlotId,
    deps: &ServerDeps,
) -> AppResult<bool> {
    Actor::new(profile_id, role)
        .has_role(Role::Professional)
        .check(deps)
        .await?;

    if AvailabilitySlot::delete_open(slot_id, profile_id, &deps.db_pool).await? {
        return Ok(true);
    }

    match AvailabilitySlot::find_by_id(slot_id, &deps.db_pool).await? {
        Some(slot) if slot.professional_id == profile_id => {
            Err(AppError::conflict("Booked slots cannot be removed"))
        }
        _ => Err(AppError::NotFound("Slot")),
    }
}

/// Open slots for a professional, defaulting to the next 7 days.
pub async fn available_slots(
    professional_id: ProfileId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    deps: &ServerDeps,
) -> AppResult<Vec<AvailabilitySlot>> {
    let now = Utc::now();
    let from = from.map_or(now, |f| f.max(now));
    let to = to.unwrap_or(from + Duration::days(7));
    if to <= from {
        return Err(AppError::validation("End of range must be after its start"));
    }
    if to - from > Duration::days(MAX_QUERY_DAYS) {
        return Err(AppError::validation(format!(
            "Range can span at most {} days",
            MAX_QUERY_DAYS
        )));
    }

    Ok(AvailabilitySlot::find_open(professional_id, from, to, &deps.db_pool).await?)
}

/// The caller's own upcoming slots, booked or not.
pub async fn my_slots(profile_id: ProfileId, deps: &ServerDeps) -> AppResult<Vec<AvailabilitySlot>> {
    Ok(AvailabilitySlot::find_for_professional(profile_id, Utc::now(), &deps.db_pool).await?)
}

fn validate_slot_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if ends_at <= starts_at {
        return Err(AppError::validation("Slot must end after it starts"));
    }
    if starts_at <= now {
        return Err(AppError::validation("Slot must start in the future"));
    }
    if ends_at - starts_at > Duration::hours(MAX_SLOT_HOURS) {
        return Err(AppError::validation(format!(
            "Slot can be at most {} hours long",
            MAX_SLOT_HOURS
        )));
    }
    Ok(())
}
