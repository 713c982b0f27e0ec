//! Admin dashboard reads

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::common::{Actor, AppResult, Capability, ProfileId};
use crate::domains::admin::models::AdminAction;
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::disputes::models::Dispute;
use crate::domains::payments::models::Payment;
use crate::domains::profiles::models::{ProfessionalDocument, Profile, Role};
use crate::kernel::ServerDeps;

const MAX_AUDIT_ROWS: i64 = 200;

#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    /// Every status, zero-filled
    pub bookings_by_status: Vec<(BookingStatus, i64)>,
    pub total_bookings: i64,
    /// Captured payments net of refunds
    pub revenue: Decimal,
    pub customers: i64,
    pub professionals: i64,
    pub pending_documents: i64,
    pub open_disputes: i64,
}

pub async fn admin_stats(
    admin_id: ProfileId,
    admin_role: Role,
    deps: &ServerDeps,
) -> AppResult<AdminStats> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ViewAuditLog)
        .check(deps)
        .await?;

    let pool = &deps.db_pool;
    let counts = Booking::count_by_status(pool).await?;
    let bookings_by_status = zero_fill(&counts);

    Ok(AdminStats {
        total_bookings: bookings_by_status.iter().map(|(_, n)| n).sum(),
        bookings_by_status,
        revenue: Payment::net_revenue(pool).await?,
        customers: Profile::count_by_role(Role::Customer, pool).await?,
        professionals: Profile::count_by_role(Role::Professional, pool).await?,
        pending_documents: ProfessionalDocument::count_pending(pool).await?,
        open_disputes: Dispute::count_open(pool).await?,
    })
}

fn zero_fill(counts: &[(BookingStatus, i64)]) -> Vec<(BookingStatus, i64)> {
    BookingStatus::ALL
        .iter()
        .map(|status| {
            let n = counts
                .iter()
                .find(|(s, _)| s == status)
                .map_or(0, |(_, n)| *n);
            (*status, n)
        })
        .collect()
}

/// Most recent audit entries, optionally for one target.
pub async fn admin_actions(
    admin_id: ProfileId,
    admin_role: Role,
    limit: Option<i32>,
    target_id: Option<Uuid>,
    deps: &ServerDeps,
) -> AppResult<Vec<AdminAction>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ViewAuditLog)
        .check(deps)
        .await?;

    if let Some(target_id) = target_id {
        return Ok(AdminAction::find_for_target(target_id, &deps.db_pool).await?);
    }
    let limit = limit.map_or(50, |l| i64::from(l).clamp(1, MAX_AUDIT_ROWS));
    Ok(AdminAction::find_recent(limit, &deps.db_pool).await?)
}
