use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::common::{AdminActionId, ProfileId};

/// Audit row written for every admin mutation.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct AdminAction {
    pub id: AdminActionId,
    pub admin_id: ProfileId,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AdminAction {
    /// Accepts a pool or an open transaction, so audit rows can commit
    /// together with the change they describe.
    pub async fn record<'e>(
        admin_id: ProfileId,
        action: &str,
        target_type: &str,
        target_id: Option<Uuid>,
        details: serde_json::Value,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO admin_actions (id, admin_id, action, target_type, target_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(AdminActionId::new())
        .bind(admin_id)
        .bind(action)
        .bind(target_type)
        .bind(target_id)
        .bind(details)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM admin_actions ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_for_target(target_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM admin_actions WHERE target_id = $1 ORDER BY created_at DESC",
        )
        .bind(target_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
