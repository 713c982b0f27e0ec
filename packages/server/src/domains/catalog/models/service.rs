use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{PageArgs, ServiceId};

/// A bookable home service with a fixed base price.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub duration_minutes: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewService {
    pub name: String,
    pub slug: String,
    pub category: String,
    #[builder(default)]
    pub description: Option<String>,
    pub base_price: Decimal,
    pub duration_minutes: i32,
    #[builder(default)]
    pub image_url: Option<String>,
}

/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ServiceChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub duration_minutes: Option<i32>,
    pub image_url: Option<String>,
}

/// Catalog browse filters. All optional.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub include_inactive: bool,
}

impl Service {
    pub async fn create(input: NewService, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO services
                (id, name, slug, category, description, base_price, duration_minutes, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(ServiceId::new())
        .bind(input.name)
        .bind(input.slug)
        .bind(input.category)
        .bind(input.description)
        .bind(input.base_price)
        .bind(input.duration_minutes)
        .bind(input.image_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ServiceId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM services WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn slug_exists(slug: &str, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM services WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list(filter: &ServiceFilter, page: PageArgs, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM services
            WHERE ($1 OR is_active)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL
                   OR name ILIKE '%' || $3 || '%'
                   OR description ILIKE '%' || $3 || '%')
              AND ($4::numeric IS NULL OR base_price >= $4)
              AND ($5::numeric IS NULL OR base_price <= $5)
            ORDER BY category, name
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.include_inactive)
        .bind(&filter.category)
        .bind(&filter.search)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Distinct categories among active services.
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM services WHERE is_active ORDER BY category",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: ServiceId, changes: ServiceChanges, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE services SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                base_price = COALESCE($5, base_price),
                duration_minutes = COALESCE($6, duration_minutes),
                image_url = COALESCE($7, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.category)
        .bind(changes.description)
        .bind(changes.base_price)
        .bind(changes.duration_minutes)
        .bind(changes.image_url)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_active(id: ServiceId, is_active: bool, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE services SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
