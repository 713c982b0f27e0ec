use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BookingId, DisputeId, PageArgs, ProfileId};

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
#[sqlx(type_name = "dispute_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    Resolved,
    Rejected,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub booking_id: BookingId,
    pub raised_by: ProfileId,
    pub reason: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub resolved_by: Option<ProfileId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Dispute {
    /// `None` when the booking already has an open dispute.
    pub async fn open(
        booking_id: BookingId,
        raised_by: ProfileId,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO disputes (id, booking_id, raised_by, reason)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (booking_id) WHERE status = 'open' DO NOTHING
            RETURNING *
            "#,
        )
        .bind(DisputeId::new())
        .bind(booking_id)
        .bind(raised_by)
        .bind(reason)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: DisputeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM disputes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_for_booking(booking_id: BookingId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM disputes WHERE booking_id = $1 ORDER BY created_at DESC",
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Close an open dispute. `None` when it was already closed.
    pub async fn close(
        id: DisputeId,
        status: DisputeStatus,
        resolution: &str,
        resolved_by: ProfileId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE disputes SET
                status = $2,
                resolution = $3,
                resolved_by = $4,
                resolved_at = NOW()
            WHERE id = $1 AND status = 'open'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(resolution)
        .bind(resolved_by)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list(status: Option<DisputeStatus>, page: PageArgs, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM disputes
            WHERE ($1::dispute_status IS NULL OR status = $1)
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

    pub async fn count_open(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM disputes WHERE status = 'open'")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}
