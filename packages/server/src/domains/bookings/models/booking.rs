use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use std::fmt;

use crate::common::{BookingId, PageArgs, ProfileId, ServiceId, SlotId};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    juniper::GraphQLEnum,
)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Refunded,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Refunded => "refunded",
        }
    }

    /// The booking lifecycle. Anything not listed here is rejected.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
                | (Confirmed, Refunded)
                | (Cancelled, Refunded)
                | (Completed, Refunded)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !Self::ALL.iter().any(|next| self.can_transition_to(*next))
    }

    /// Statuses a slot stays claimed in.
    pub fn holds_slot(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub customer_id: ProfileId,
    pub professional_id: Option<ProfileId>,
    pub service_id: ServiceId,
    pub slot_id: Option<SlotId>,
    pub scheduled_at: DateTime<Utc>,
    pub address: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub total_amount: Decimal,
    pub currency: String,
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<ProfileId>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: ProfileId,
    pub professional_id: Option<ProfileId>,
    pub service_id: ServiceId,
    pub slot_id: Option<SlotId>,
    pub scheduled_at: DateTime<Utc>,
    pub address: String,
    pub notes: Option<String>,
    pub total_amount: Decimal,
    pub currency: String,
}

/// Who is looking at a booking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingView {
    Customer(ProfileId),
    Professional(ProfileId),
}

/// Extra columns written alongside a status change.
#[derive(Debug, Clone, Default)]
pub struct TransitionDetails {
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<ProfileId>,
}

impl Booking {
    pub async fn create<'e>(input: NewBooking, executor: impl PgExecutor<'e>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO bookings
                (id, customer_id, professional_id, service_id, slot_id, scheduled_at,
                 address, notes, total_amount, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(BookingId::new())
        .bind(input.customer_id)
        .bind(input.professional_id)
        .bind(input.service_id)
        .bind(input.slot_id)
        .bind(input.scheduled_at)
        .bind(input.address)
        .bind(input.notes)
        .bind(input.total_amount)
        .bind(input.currency)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id<'e>(id: BookingId, executor: impl PgExecutor<'e>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Move a booking from `from` to `to`.
    ///
    /// The update only matches while the row is still in `from`, so two
    /// racing transitions cannot both succeed. `None` means the booking was
    /// not in `from` (or does not exist). Callers check the lifecycle table
    /// first; this method does not.
    pub async fn transition<'e>(
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        details: TransitionDetails,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE bookings SET
                status = $3,
                confirmed_at = CASE WHEN $3 = 'confirmed'::booking_status THEN NOW() ELSE confirmed_at END,
                started_at = CASE WHEN $3 = 'in_progress'::booking_status THEN NOW() ELSE started_at END,
                completed_at = CASE WHEN $3 = 'completed'::booking_status THEN NOW() ELSE completed_at END,
                cancelled_at = CASE WHEN $3 = 'cancelled'::booking_status THEN NOW() ELSE cancelled_at END,
                cancellation_reason = COALESCE($4, cancellation_reason),
                cancelled_by = COALESCE($5, cancelled_by),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(details.cancellation_reason)
        .bind(details.cancelled_by)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Set the professional on a booking that has not started yet.
    pub async fn assign_professional(
        id: BookingId,
        professional_id: ProfileId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE bookings SET professional_id = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'confirmed')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(professional_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for(
        view: BookingView,
        status: Option<BookingStatus>,
        page: PageArgs,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let (column, profile_id) = match view {
            BookingView::Customer(id) => ("customer_id", id),
            BookingView::Professional(id) => ("professional_id", id),
        };
        let query = format!(
            r#"
            SELECT * FROM bookings
            WHERE {} = $1 AND ($2::booking_status IS NULL OR status = $2)
            ORDER BY scheduled_at DESC
            LIMIT $3 OFFSET $4
            "#,
            column
        );
        sqlx::query_as::<_, Self>(&query)
            .bind(profile_id)
            .bind(status)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list(status: Option<BookingStatus>, page: PageArgs, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::booking_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(BookingStatus, i64)>> {
        sqlx::query_as::<_, (BookingStatus, i64)>(
            "SELECT status, COUNT(*) FROM bookings GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Cancel pending bookings created before `now - ttl` and free their
    /// slots. Returns the cancelled rows.
    pub async fn cancel_stale_pending(ttl: Duration, pool: &PgPool) -> Result<Vec<Self>> {
        let mut tx = pool.begin().await?;

        let cancelled = sqlx::query_as::<_, Self>(
            r#"
            UPDATE bookings SET
                status = 'cancelled',
                cancelled_at = NOW(),
                cancellation_reason = 'Payment not completed in time',
                updated_at = NOW()
            WHERE status = 'pending' AND created_at < $1
            RETURNING *
            "#,
        )
        .bind(Utc::now() - ttl)
        .fetch_all(&mut *tx)
        .await?;

        let slot_ids: Vec<SlotId> = cancelled.iter().filter_map(|b| b.slot_id).collect();
        if !slot_ids.is_empty() {
            sqlx::query("UPDATE availability_slots SET is_booked = false WHERE id = ANY($1)")
                .bind(&slot_ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(cancelled)
    }

    pub fn is_participant(&self, profile_id: ProfileId) -> bool {
        self.customer_id == profile_id || self.professional_id == Some(profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Refunded));
    }

    #[test]
    fn test_cancellation_transitions() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(Cancelled.can_transition_to(Refunded));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Refunded));
        assert!(!Confirmed.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(Refunded));
        for status in BookingStatus::ALL {
            assert!(!Refunded.can_transition_to(status));
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(Refunded.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!Cancelled.is_terminal());
        assert!(!Completed.is_terminal());
    }

    #[test]
    fn test_holds_slot() {
        assert!(Pending.holds_slot());
        assert!(InProgress.holds_slot());
        assert!(!Cancelled.holds_slot());
        assert!(!Completed.holds_slot());
    }

    #[test]
    fn test_status_labels_match_db() {
        assert_eq!(InProgress.as_str(), "in_progress");
        assert_eq!(serde_json::to_string(&InProgress).unwrap(), "\"in_progress\"");
    }
}
