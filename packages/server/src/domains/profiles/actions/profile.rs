//! Profile actions

use serde_json::json;
use tracing::info;

use crate::common::{Actor, AppError, AppResult, Capability, PageArgs, ProfileId};
use crate::domains::admin::models::AdminAction;
use crate::domains::notifications::{kinds, notify};
use crate::domains::profiles::models::{Profile, ProfileChanges, Role};
use crate::kernel::ServerDeps;

const MAX_NAME_LEN: usize = 120;
const MAX_BIO_LEN: usize = 1000;

pub async fn get_profile(profile_id: ProfileId, deps: &ServerDeps) -> AppResult<Profile> {
    Profile::find_by_id(profile_id, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Profile"))
}

/// Public view of a professional. Hidden unless active.
pub async fn get_professional(profile_id: ProfileId, deps: &ServerDeps) -> AppResult<Profile> {
    match Profile::find_by_id(profile_id, &deps.db_pool).await? {
        Some(p) if p.role == Role::Professional && p.is_active => Ok(p),
        _ => Err(AppError::NotFound("Professional")),
    }
}

/// Update the caller's own profile.
pub async fn update_profile(
    profile_id: ProfileId,
    changes: ProfileChanges,
    deps: &ServerDeps,
) -> AppResult<Profile> {
    let changes = validate_changes(changes)?;
    let profile = Profile::update_details(profile_id, changes, &deps.db_pool).await?;
    info!(profile_id = %profile_id, "Profile updated");
    Ok(profile)
}

fn validate_changes(changes: ProfileChanges) -> AppResult<ProfileChanges> {
    let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
    let changes = ProfileChanges {
        full_name: trim(changes.full_name),
        email: trim(changes.email),
        avatar_url: trim(changes.avatar_url),
        city: trim(changes.city),
        bio: trim(changes.bio),
    };

    if let Some(name) = &changes.full_name {
        if name.is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::validation(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
    }
    if let Some(email) = &changes.email {
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(AppError::validation("Enter a valid email address"));
        }
    }
    if let Some(bio) = &changes.bio {
        if bio.chars().count() > MAX_BIO_LEN {
            return Err(AppError::validation(format!(
                "Bio must be at most {} characters",
                MAX_BIO_LEN
            )));
        }
    }

    Ok(changes)
}

// =============================================================================
// Admin
// =============================================================================

pub async fn list_profiles(
    admin_id: ProfileId,
    admin_role: Role,
    role: Option<Role>,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Profile>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageProfiles)
        .check(deps)
        .await?;

    Ok(Profile::list(role, page, &deps.db_pool).await?)
}

pub async fn set_profile_role(
    admin_id: ProfileId,
    admin_role: Role,
    target_id: ProfileId,
    role: Role,
    deps: &ServerDeps,
) -> AppResult<Profile> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageProfiles)
        .check(deps)
        .await?;

    if target_id == admin_id {
        return Err(AppError::validation("You cannot change your own role"));
    }

    let before = get_profile(target_id, deps).await?;
    let profile = Profile::set_role(target_id, role, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;

    AdminAction::record(
        admin_id,
        "set_role",
        "profile",
        Some(target_id.into_uuid()),
        json!({ "from": before.role, "to": role }),
        &deps.db_pool,
    )
    .await?;

    info!(admin_id = %admin_id, target_id = %target_id, role = %role, "Profile role changed");
    Ok(profile)
}

/// Suspend (`false`) or reinstate (`true`) a profile.
pub async fn set_profile_active(
    admin_id: ProfileId,
    admin_role: Role,
    target_id: ProfileId,
    is_active: bool,
    reason: Option<String>,
    deps: &ServerDeps,
) -> AppResult<Profile> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageProfiles)
        .check(deps)
        .await?;

    if target_id == admin_id && !is_active {
        return Err(AppError::validation("You cannot suspend your own account"));
    }

    let profile = Profile::set_active(target_id, is_active, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;

    let action = if is_active { "reinstate_profile" } else { "suspend_profile" };
    AdminAction::record(
        admin_id,
        action,
        "profile",
        Some(target_id.into_uuid()),
        json!({ "reason": reason }),
        &deps.db_pool,
    )
    .await?;

    let (title, body) = if is_active {
        ("Account reinstated", "Your account is active again.")
    } else {
        ("Account suspended", "Your account has been suspended. Contact support for details.")
    };
    notify(target_id, kinds::ACCOUNT_STATUS, title, body, deps).await;

    info!(admin_id = %admin_id, target_id = %target_id, is_active, "Profile status changed");
    Ok(profile)
}

/// Mark a professional as verified (or revoke it). Only verified
/// professionals appear in listings and can take bookings.
pub async fn verify_professional(
    admin_id: ProfileId,
    admin_role: Role,
    target_id: ProfileId,
    is_verified: bool,
    deps: &ServerDeps,
) -> AppResult<Profile> {
    Actor::new(admin_id, admin_role)
        .can(Capability::VerifyDocuments)
        .check(deps)
        .await?;

    let profile = Profile::set_verified(target_id, is_verified, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Professional"))?;

    AdminAction::record(
        admin_id,
        if is_verified { "verify_professional" } else { "unverify_professional" },
        "profile",
        Some(target_id.into_uuid()),
        json!({}),
        &deps.db_pool,
    )
    .await?;

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_accepts() {
        let changes = validate_changes(ProfileChanges {
            full_name: Some("  Asha Rao ".to_string()),
            email: Some("asha@example.com".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.full_name.as_deref(), Some("Asha Rao"));
    }

    #[test]
    fn test_validate_rejects_long_name() {
        let result = validate_changes(ProfileChanges {
            full_name: Some("a".repeat(121)),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        for email in ["no-at-sign", "@example.com", "user@localhost"] {
            let result = validate_changes(ProfileChanges {
                email: Some(email.to_string()),
                ..Default::default()
            });
            assert!(result.is_err(), "accepted {}", email);
        }
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let result = validate_changes(ProfileChanges {
            full_name: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
