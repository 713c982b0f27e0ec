//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! - Expired OTP codes are purged every hour
//! - Pending bookings left unpaid are cancelled every 15 minutes, freeing
//!   their availability slots and notifying both parties

use anyhow::Result;
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::auth::models::OtpCode;
use crate::domains::bookings::actions::notify_status_change;
use crate::domains::bookings::models::Booking;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(
    deps: Arc<ServerDeps>,
    pending_booking_ttl_hours: i64,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let otp_pool = deps.db_pool.clone();
    let otp_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pool = otp_pool.clone();
        Box::pin(async move {
            if let Err(e) = run_otp_purge(&pool).await {
                tracing::error!("OTP purge task failed: {}", e);
            }
        })
    })?;

    scheduler.add(otp_job).await?;

    let booking_job = Job::new_async("0 */15 * * * *", move |_uuid, _lock| {
        let deps = deps.clone();
        Box::pin(async move {
            if let Err(e) = run_stale_booking_sweep(&deps, pending_booking_ttl_hours).await {
                tracing::error!("Stale booking sweep failed: {}", e);
            }
        })
    })?;

    scheduler.add(booking_job).await?;
    scheduler.start().await?;

    tracing::info!(
        "Scheduled tasks started (OTP purge hourly, stale booking sweep every 15 minutes)"
    );
    Ok(scheduler)
}

/// Delete OTP codes that expired more than a day ago
pub async fn run_otp_purge(pool: &PgPool) -> Result<u64> {
    let removed = OtpCode::purge_expired(Duration::hours(24), pool).await?;
    tracing::info!(removed, "OTP purge complete");
    Ok(removed)
}

/// Cancel pending bookings older than the TTL, release their slots and
/// tell the customer and professional.
pub async fn run_stale_booking_sweep(deps: &ServerDeps, ttl_hours: i64) -> Result<usize> {
    let cancelled =
        Booking::cancel_stale_pending(Duration::hours(ttl_hours), &deps.db_pool).await?;
    if !cancelled.is_empty() {
        tracing::info!(count = cancelled.len(), "Cancelled stale pending bookings");
    }
    for booking in &cancelled {
        notify_status_change(booking, deps).await;
    }
    Ok(cancelled.len())
}
