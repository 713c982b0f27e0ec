use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{BookingId, PaymentId, ProfileId};

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
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Gateway order exists, nothing captured yet
    Created,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Money has been captured for this payment at some point.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Refunded)
    }
}

/// One gateway order per booking. Retries reuse the row.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub customer_id: ProfileId,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub failure_reason: Option<String>,
    pub refund_id: Option<String>,
    pub refund_amount: Option<Decimal>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Insert the payment for a booking, or point an unsettled one at a new
    /// gateway order. `None` when the existing row is already settled.
    pub async fn upsert_order<'e>(
        booking_id: BookingId,
        customer_id: ProfileId,
        gateway_order_id: &str,
        amount: Decimal,
        currency: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO payments (id, booking_id, customer_id, gateway_order_id, amount, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (booking_id) DO UPDATE SET
                gateway_order_id = EXCLUDED.gateway_order_id,
                amount = EXCLUDED.amount,
                currency = EXCLUDED.currency,
                status = 'created',
                gateway_payment_id = NULL,
                failure_reason = NULL,
                updated_at = NOW()
            WHERE payments.status IN ('created', 'failed')
            RETURNING *
            "#,
        )
        .bind(PaymentId::new())
        .bind(booking_id)
        .bind(customer_id)
        .bind(gateway_order_id)
        .bind(amount)
        .bind(currency)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Point an unsettled payment back at an earlier order of the same
    /// booking. `None` when the payment is already settled.
    pub async fn adopt_order(
        booking_id: BookingId,
        gateway_order_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE payments SET
                gateway_order_id = $2,
                updated_at = NOW()
            WHERE booking_id = $1 AND status IN ('created', 'failed')
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(gateway_order_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_booking(booking_id: BookingId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM payments WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_order_id<'e>(
        gateway_order_id: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM payments WHERE gateway_order_id = $1")
            .bind(gateway_order_id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_gateway_payment_id(
        gateway_payment_id: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM payments WHERE gateway_payment_id = $1")
            .bind(gateway_payment_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// `None` when the payment was already settled.
    pub async fn mark_paid<'e>(
        gateway_order_id: &str,
        gateway_payment_id: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE payments SET
                status = 'paid',
                gateway_payment_id = $2,
                failure_reason = NULL,
                paid_at = NOW(),
                updated_at = NOW()
            WHERE gateway_order_id = $1 AND status IN ('created', 'failed')
            RETURNING *
            "#,
        )
        .bind(gateway_order_id)
        .bind(gateway_payment_id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Never downgrades a settled payment.
    pub async fn mark_failed(
        gateway_order_id: &str,
        gateway_payment_id: Option<&str>,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE payments SET
                status = 'failed',
                gateway_payment_id = COALESCE($2, gateway_payment_id),
                failure_reason = $3,
                updated_at = NOW()
            WHERE gateway_order_id = $1 AND status IN ('created', 'failed')
            RETURNING *
            "#,
        )
        .bind(gateway_order_id)
        .bind(gateway_payment_id)
        .bind(reason)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// `None` when the payment was not in `paid`.
    pub async fn mark_refunded<'e>(
        id: PaymentId,
        refund_id: &str,
        refund_amount: Decimal,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE payments SET
                status = 'refunded',
                refund_id = $2,
                refund_amount = $3,
                refunded_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'paid'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(refund_id)
        .bind(refund_amount)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Captured money net of refunds.
    pub async fn net_revenue(pool: &PgPool) -> Result<Decimal> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount - COALESCE(refund_amount, 0)), 0)
            FROM payments
            WHERE status IN ('paid', 'refunded')
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_statuses() {
        assert!(PaymentStatus::Paid.is_settled());
        assert!(PaymentStatus::Refunded.is_settled());
        assert!(!PaymentStatus::Created.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
    }
}
