use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{PageArgs, ProfileId};

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
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Professional,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Professional => "professional",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Professional => "Professional",
            Role::Admin => "Admin",
        }
    }

    /// Admins satisfy every role requirement; other roles only their own.
    pub fn satisfies(&self, required: Role) -> bool {
        *self == Role::Admin || *self == required
    }

    /// Roles a user may pick for themselves at sign-up.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Role::Customer | Role::Professional)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "professional" => Ok(Role::Professional),
            "admin" => Ok(Role::Admin),
            other => anyhow::bail!("unknown role: {}", other),
        }
    }
}

/// A user of the marketplace. One row per verified phone number.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub phone_number: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    /// Professionals only: set by an admin after document review.
    pub is_verified: bool,
    /// False when suspended by an admin.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

impl Profile {
    pub async fn find_by_id(id: ProfileId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_phone(phone_number: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE phone_number = $1")
            .bind(phone_number)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a profile for `phone_number` unless one already exists.
    ///
    /// Returns the id of the existing or new row; concurrent sign-ins for the
    /// same phone converge on one profile.
    pub async fn ensure_for_phone(
        phone_number: &str,
        role: Role,
        pool: &PgPool,
    ) -> Result<(ProfileId, bool)> {
        let inserted = sqlx::query_scalar::<_, ProfileId>(
            r#"
            INSERT INTO profiles (id, phone_number, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (phone_number) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(ProfileId::new())
        .bind(phone_number)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        if let Some(id) = inserted {
            return Ok((id, true));
        }

        let existing =
            sqlx::query_scalar::<_, ProfileId>("SELECT id FROM profiles WHERE phone_number = $1")
                .bind(phone_number)
                .fetch_one(pool)
                .await?;
        Ok((existing, false))
    }

    /// Role and active flag only; used by the authorization layer.
    pub async fn find_access(id: ProfileId, pool: &PgPool) -> Result<Option<(Role, bool)>> {
        sqlx::query_as::<_, (Role, bool)>("SELECT role, is_active FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn update_details(id: ProfileId, changes: ProfileChanges, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                avatar_url = COALESCE($4, avatar_url),
                city = COALESCE($5, city),
                bio = COALESCE($6, bio),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.full_name)
        .bind(changes.email)
        .bind(changes.avatar_url)
        .bind(changes.city)
        .bind(changes.bio)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_role(id: ProfileId, role: Role, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_active(id: ProfileId, is_active: bool, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE profiles SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_verified(id: ProfileId, is_verified: bool, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE profiles SET is_verified = $2, updated_at = NOW()
            WHERE id = $1 AND role = 'professional'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_verified)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list(role: Option<Role>, page: PageArgs, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM profiles
            WHERE ($1::user_role IS NULL OR role = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(role)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_role(role: Role, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE role = $1")
            .bind(role)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Active, verified professionals offering a service.
    pub async fn find_professionals_for_service(
        service_id: crate::common::ServiceId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT p.* FROM profiles p
            JOIN professional_services ps ON ps.professional_id = p.id
            WHERE ps.service_id = $1
              AND p.role = 'professional'
              AND p.is_active
              AND p.is_verified
            ORDER BY p.full_name NULLS LAST
            "#,
        )
        .bind(service_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.phone_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!(" Professional ".parse::<Role>().unwrap(), Role::Professional);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_satisfies() {
        assert!(Role::Admin.satisfies(Role::Customer));
        assert!(Role::Admin.satisfies(Role::Professional));
        assert!(Role::Customer.satisfies(Role::Customer));
        assert!(!Role::Customer.satisfies(Role::Professional));
        assert!(!Role::Professional.satisfies(Role::Admin));
    }

    #[test]
    fn test_admin_not_self_assignable() {
        assert!(Role::Customer.is_self_assignable());
        assert!(Role::Professional.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
    }

    #[test]
    fn test_role_serde_matches_db_labels() {
        assert_eq!(serde_json::to_string(&Role::Professional).unwrap(), "\"professional\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
