use anyhow::Result;
use sqlx::PgPool;

/// Gateway webhook deliveries already handled, keyed by event id.
pub struct WebhookEventLog;

impl WebhookEventLog {
    pub async fn exists(event_id: &str, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM webhook_events WHERE event_id = $1)")
            .bind(event_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// False when the event was already recorded.
    pub async fn record(event_id: &str, event_type: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO webhook_events (event_id, event_type)
            VALUES ($1, $2)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(event_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
