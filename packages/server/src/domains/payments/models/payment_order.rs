use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::common::{BookingId, PaymentId};

/// A gateway order issued for a booking, current or superseded.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct PaymentOrder {
    pub gateway_order_id: String,
    pub payment_id: PaymentId,
    pub booking_id: BookingId,
    pub amount: Decimal,
    pub orphan_payment_id: Option<String>,
    pub flagged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PaymentOrder {
    pub async fn record<'e>(
        gateway_order_id: &str,
        payment_id: PaymentId,
        booking_id: BookingId,
        amount: Decimal,
        executor: impl PgExecutor<'e>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_orders (gateway_order_id, payment_id, booking_id, amount)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (gateway_order_id) DO NOTHING
            "#,
        )
        .bind(gateway_order_id)
        .bind(payment_id)
        .bind(booking_id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find(gateway_order_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM payment_orders WHERE gateway_order_id = $1")
            .bind(gateway_order_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Mark money captured on this order as needing a refund.
    pub async fn flag_orphan_capture(
        gateway_order_id: &str,
        gateway_payment_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE payment_orders SET
                orphan_payment_id = $2,
                flagged_at = COALESCE(flagged_at, NOW())
            WHERE gateway_order_id = $1
            RETURNING *
            "#,
        )
        .bind(gateway_order_id)
        .bind(gateway_payment_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Captures awaiting a refund, oldest first.
    pub async fn flagged(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM payment_orders WHERE flagged_at IS NOT NULL ORDER BY flagged_at",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
