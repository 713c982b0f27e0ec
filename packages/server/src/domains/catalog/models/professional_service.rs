use anyhow::Result;
use sqlx::PgPool;

use crate::common::{ProfileId, ServiceId};
use crate::domains::catalog::models::Service;

/// Link between a professional and a service they offer.
pub struct ProfessionalService;

impl ProfessionalService {
    /// Idempotent.
    pub async fn add(professional_id: ProfileId, service_id: ServiceId, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO professional_services (professional_id, service_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(professional_id)
        .bind(service_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Returns false if the link did not exist.
    pub async fn remove(professional_id: ProfileId, service_id: ServiceId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM professional_services WHERE professional_id = $1 AND service_id = $2",
        )
        .bind(professional_id)
        .bind(service_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(professional_id: ProfileId, service_id: ServiceId, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM professional_services
                WHERE professional_id = $1 AND service_id = $2
            )
            "#,
        )
        .bind(professional_id)
        .bind(service_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn services_for(professional_id: ProfileId, pool: &PgPool) -> Result<Vec<Service>> {
        sqlx::query_as::<_, Service>(
            r#"
            SELECT s.* FROM services s
            JOIN professional_services ps ON ps.service_id = s.id
            WHERE ps.professional_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(professional_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
