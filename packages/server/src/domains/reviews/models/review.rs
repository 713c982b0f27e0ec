use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{BookingId, PageArgs, ProfileId, ReviewId, ServiceId};

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub customer_id: ProfileId,
    pub professional_id: Option<ProfileId>,
    pub service_id: ServiceId,
    pub rating: i16,
    pub comment: Option<String>,
    pub is_visible: bool,
    /// Set by an admin after checking the review
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a review summary is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSubject {
    Service(ServiceId),
    Professional(ProfileId),
}

/// Average rating and count over visible reviews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    /// Average rounded to one decimal.
    pub fn from_totals(sum: i64, count: i64) -> Self {
        if count == 0 {
            return Self {
                average: 0.0,
                count: 0,
            };
        }
        let average = (sum as f64 / count as f64 * 10.0).round() / 10.0;
        Self { average, count }
    }
}

impl Review {
    /// `None` when the booking already has a review.
    pub async fn create(
        booking_id: BookingId,
        customer_id: ProfileId,
        professional_id: Option<ProfileId>,
        service_id: ServiceId,
        rating: i16,
        comment: Option<String>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO reviews (id, booking_id, customer_id, professional_id, service_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (booking_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(ReviewId::new())
        .bind(booking_id)
        .bind(customer_id)
        .bind(professional_id)
        .bind(service_id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ReviewId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_visible(subject: ReviewSubject, page: PageArgs, pool: &PgPool) -> Result<Vec<Self>> {
        let (column, id) = subject_column(subject);
        let query = format!(
            r#"
            SELECT * FROM reviews
            WHERE {} = $1 AND is_visible
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            column
        );
        sqlx::query_as::<_, Self>(&query)
            .bind(id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn summary(subject: ReviewSubject, pool: &PgPool) -> Result<RatingSummary> {
        let (column, id) = subject_column(subject);
        let query = format!(
            "SELECT COALESCE(SUM(rating), 0)::BIGINT, COUNT(*) FROM reviews WHERE {} = $1 AND is_visible",
            column
        );
        let (sum, count) = sqlx::query_as::<_, (i64, i64)>(&query)
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(RatingSummary::from_totals(sum, count))
    }

    /// `None` leaves a flag unchanged.
    pub async fn moderate(
        id: ReviewId,
        is_visible: Option<bool>,
        is_verified: Option<bool>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE reviews SET
                is_visible = COALESCE($2, is_visible),
                is_verified = COALESCE($3, is_verified),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_visible)
        .bind(is_verified)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list(is_visible: Option<bool>, page: PageArgs, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM reviews
            WHERE ($1::BOOLEAN IS NULL OR is_visible = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(is_visible)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

fn subject_column(subject: ReviewSubject) -> (&'static str, uuid::Uuid) {
    match subject {
        ReviewSubject::Service(id) => ("service_id", id.into_uuid()),
        ReviewSubject::Professional(id) => ("professional_id", id.into_uuid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_rounds_to_one_decimal() {
        // 5 + 4 + 4 = 13 / 3 = 4.333..
        assert_eq!(RatingSummary::from_totals(13, 3).average, 4.3);
        // 5 + 4 = 9 / 2 = 4.5
        assert_eq!(RatingSummary::from_totals(9, 2).average, 4.5);
        // 14 / 3 = 4.666..
        assert_eq!(RatingSummary::from_totals(14, 3).average, 4.7);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RatingSummary::from_totals(0, 0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, 0.0);
    }
}
