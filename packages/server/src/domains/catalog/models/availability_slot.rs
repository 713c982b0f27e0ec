use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::common::{ProfileId, SlotId};

/// A window in which a professional can take one booking.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct AvailabilitySlot {
    pub id: SlotId,
    pub professional_id: ProfileId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub async fn create(
        professional_id: ProfileId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO availability_slots (id, professional_id, starts_at, ends_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(SlotId::new())
        .bind(professional_id)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: SlotId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM availability_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Whether `[starts_at, ends_at)` intersects any of the professional's slots.
    pub async fn overlaps_existing(
        professional_id: ProfileId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM availability_slots
                WHERE professional_id = $1
                  AND starts_at < $3
                  AND ends_at > $2
            )
            "#,
        )
        .bind(professional_id)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Open slots for a professional in `[from, to)`.
    pub async fn find_open(
        professional_id: ProfileId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM availability_slots
            WHERE professional_id = $1
              AND NOT is_booked
              AND starts_at >= $2
              AND starts_at < $3
            ORDER BY starts_at
            "#,
        )
        .bind(professional_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_professional(
        professional_id: ProfileId,
        from: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM availability_slots
            WHERE professional_id = $1 AND ends_at > $2
            ORDER BY starts_at
            "#,
        )
        .bind(professional_id)
        .bind(from)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Atomically claim an open slot. `None` means it was already taken.
    pub async fn claim<'e>(
        id: SlotId,
        professional_id: ProfileId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE availability_slots SET is_booked = true
            WHERE id = $1 AND professional_id = $2 AND NOT is_booked
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(professional_id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn release<'e>(id: SlotId, executor: impl PgExecutor<'e>) -> Result<()> {
        sqlx::query("UPDATE availability_slots SET is_booked = false WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Delete an unbooked slot owned by `professional_id`.
    pub async fn delete_open(id: SlotId, professional_id: ProfileId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM availability_slots WHERE id = $1 AND professional_id = $2 AND NOT is_booked",
        )
        .bind(id)
        .bind(professional_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
