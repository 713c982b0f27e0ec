//! Notification actions
//!
//! `notify` is fire-and-forget from the caller's point of view: it never
//! returns an error, failures are logged.

use tracing::{debug, warn};

use crate::common::utils::mask_phone;
use crate::common::{AppError, AppResult, NotificationId, PageArgs, ProfileId};
use crate::domains::notifications::models::Notification;
use crate::domains::profiles::models::Profile;
use crate::kernel::ServerDeps;

/// Notification kinds. Clients switch on these for icons and deep links.
pub mod kinds {
    pub const BOOKING_CREATED: &str = "booking_created";
    pub const BOOKING_STATUS: &str = "booking_status";
    pub const PAYMENT_RECEIVED: &str = "payment_received";
    pub const PAYMENT_FAILED: &str = "payment_failed";
    pub const REFUND_ISSUED: &str = "refund_issued";
    pub const DOCUMENT_REVIEWED: &str = "document_reviewed";
    pub const DISPUTE_UPDATE: &str = "dispute_update";
    pub const ACCOUNT_STATUS: &str = "account_status";
}

/// Store an in-app notification and, when enabled, text it.
pub async fn notify(profile_id: ProfileId, kind: &str, title: &str, body: &str, deps: &ServerDeps) {
    if let Err(e) = Notification::create(profile_id, kind, title, body, &deps.db_pool).await {
        warn!(profile_id = %profile_id, kind, error = %e, "Failed to store notification");
    }

    if !deps.sms_notifications_enabled {
        return;
    }

    let profile = match Profile::find_by_id(profile_id, &deps.db_pool).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return,
        Err(e) => {
            warn!(profile_id = %profile_id, error = %e, "Failed to load profile for SMS notification");
            return;
        }
    };

    let text = format!("{}: {}", title, body);
    match deps.sms.send_sms(&profile.phone_number, &text).await {
        Ok(()) => debug!(phone = %mask_phone(&profile.phone_number), kind, "Notification SMS sent"),
        Err(e) => warn!(
            phone = %mask_phone(&profile.phone_number),
            kind,
            error = %e,
            "Notification SMS failed"
        ),
    }
}

pub async fn my_notifications(
    profile_id: ProfileId,
    unread_only: bool,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Notification>> {
    Ok(Notification::find_for_profile(profile_id, unread_only, page, &deps.db_pool).await?)
}

pub async fn unread_count(profile_id: ProfileId, deps: &ServerDeps) -> AppResult<i64> {
    Ok(Notification::count_unread(profile_id, &deps.db_pool).await?)
}

pub async fn mark_notification_read(
    profile_id: ProfileId,
    notification_id: NotificationId,
    deps: &ServerDeps,
) -> AppResult<Notification> {
    Notification::mark_read(notification_id, profile_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Notification"))
}

pub async fn mark_all_notifications_read(profile_id: ProfileId, deps: &ServerDeps) -> AppResult<i64> {
    let updated = Notification::mark_all_read(profile_id, &deps.db_pool).await?;
    Ok(updated as i64)
}
