use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::SectionId;

/// A content block on the public homepage, addressed by slug.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct HomepageSection {
    pub id: SectionId,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SectionContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
}

impl HomepageSection {
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM homepage_sections WHERE is_active ORDER BY position, slug",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM homepage_sections ORDER BY position, slug")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert or replace the section with this slug.
    pub async fn upsert(slug: &str, content: SectionContent, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO homepage_sections
                (id, slug, title, subtitle, body, image_url, cta_label, cta_url, position, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                subtitle = EXCLUDED.subtitle,
                body = EXCLUDED.body,
                image_url = EXCLUDED.image_url,
                cta_label = EXCLUDED.cta_label,
                cta_url = EXCLUDED.cta_url,
                position = EXCLUDED.position,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(SectionId::new())
        .bind(slug)
        .bind(content.title)
        .bind(content.subtitle)
        .bind(content.body)
        .bind(content.image_url)
        .bind(content.cta_label)
        .bind(content.cta_url)
        .bind(content.position)
        .bind(content.is_active)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("DELETE FROM homepage_sections WHERE slug = $1 RETURNING *")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
