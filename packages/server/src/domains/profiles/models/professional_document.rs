use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{DocumentId, ProfileId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, juniper::GraphQLEnum,
)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

/// Identity or trade document uploaded by a professional for verification.
///
/// The file itself lives in object storage; only its key is stored here.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct ProfessionalDocument {
    pub id: DocumentId,
    pub professional_id: ProfileId,
    pub document_type: String,
    pub storage_key: String,
    pub status: DocumentStatus,
    pub reviewer_id: Option<ProfileId>,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ProfessionalDocument {
    pub async fn create(
        professional_id: ProfileId,
        document_type: &str,
        storage_key: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO professional_documents (id, professional_id, document_type, storage_key)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(DocumentId::new())
        .bind(professional_id)
        .bind(document_type)
        .bind(storage_key)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: DocumentId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM professional_documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_for_professional(professional_id: ProfileId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM professional_documents WHERE professional_id = $1 ORDER BY created_at DESC",
        )
        .bind(professional_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Oldest first, so reviewers work through the queue in order.
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM professional_documents WHERE status = 'pending' ORDER BY created_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_pending(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM professional_documents WHERE status = 'pending'",
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Record a review decision. Only pending documents can be reviewed;
    /// returns `None` if the document was already decided.
    pub async fn review(
        id: DocumentId,
        status: DocumentStatus,
        reviewer_id: ProfileId,
        notes: Option<&str>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE professional_documents
            SET status = $2, reviewer_id = $3, review_notes = $4, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewer_id)
        .bind(notes)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
