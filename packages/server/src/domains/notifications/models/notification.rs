use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{NotificationId, PageArgs, ProfileId};

/// In-app notification shown on the user's dashboard.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub profile_id: ProfileId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub async fn create(
        profile_id: ProfileId,
        kind: &str,
        title: &str,
        body: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO notifications (id, profile_id, kind, title, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(NotificationId::new())
        .bind(profile_id)
        .bind(kind)
        .bind(title)
        .bind(body)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_profile(
        profile_id: ProfileId,
        unread_only: bool,
        page: PageArgs,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM notifications
            WHERE profile_id = $1 AND (NOT $2 OR NOT is_read)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(profile_id)
        .bind(unread_only)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_unread(profile_id: ProfileId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE profile_id = $1 AND NOT is_read",
        )
        .bind(profile_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Scoped to the owner; returns `None` for someone else's notification.
    pub async fn mark_read(
        id: NotificationId,
        profile_id: ProfileId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE notifications SET is_read = true
            WHERE id = $1 AND profile_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(profile_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_all_read(profile_id: ProfileId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE profile_id = $1 AND NOT is_read",
        )
        .bind(profile_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
