//! Verify OTP action

use chrono::Utc;
use tracing::{info, warn};

use crate::common::auth::dashboard_path;
use crate::common::utils::{mask_phone, normalize_phone};
use crate::common::{AppError, AppResult};
use crate::domains::auth::actions::resolve_role;
use crate::domains::auth::models::{is_admin_identifier, is_well_formed_code, OtpCode};
use crate::domains::auth::types::Session;
use crate::domains::profiles::models::{Profile, Role};
use crate::kernel::ServerDeps;

/// Check a login code and open a session.
///
/// The attempt counter is incremented before the comparison, so the sixth
/// submission is refused even when it carries the right code. First-time
/// phones get a profile with the requested role (customer or professional);
/// numbers in the admin list always sign in as admin.
pub async fn verify_otp(
    raw_phone: &str,
    code: &str,
    requested_role: Option<Role>,
    deps: &ServerDeps,
) -> AppResult<Session> {
    let phone_number = normalize_phone(raw_phone, &deps.default_country_code)
        .map_err(|e| AppError::validation(e.to_string()))?;

    if !is_well_formed_code(code) {
        return Err(AppError::validation("Enter the 6-digit code"));
    }

    let otp = OtpCode::find_active(&phone_number, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::validation("No active verification code. Request a new one."))?;

    if otp.is_expired(Utc::now()) {
        return Err(AppError::validation(
            "Verification code has expired. Request a new one.",
        ));
    }

    if otp.attempts_exhausted() {
        return Err(too_many_attempts());
    }

    let attempts = OtpCode::register_attempt(otp.id, &deps.db_pool)
        .await?
        .ok_or_else(too_many_attempts)?;

    if !otp.matches(code) {
        let remaining = (otp.max_attempts - attempts).max(0);
        warn!(phone = %mask_phone(&phone_number), attempts, "Incorrect OTP");
        if remaining == 0 {
            return Err(too_many_attempts());
        }
        return Err(AppError::validation(format!(
            "Incorrect code. {} attempt{} remaining.",
            remaining,
            if remaining == 1 { "" } else { "s" }
        )));
    }

    if !OtpCode::mark_verified(otp.id, &deps.db_pool).await? {
        return Err(AppError::validation("This code has already been used"));
    }

    let is_admin = is_admin_identifier(&phone_number, &deps.admin_identifiers);
    let signup_role = if is_admin {
        Role::Admin
    } else {
        requested_role
            .filter(Role::is_self_assignable)
            .unwrap_or(Role::Customer)
    };

    let (profile_id, is_new_profile) =
        Profile::ensure_for_phone(&phone_number, signup_role, &deps.db_pool).await?;

    if is_new_profile {
        info!(profile_id = %profile_id, role = %signup_role, "Created profile");
    } else if is_admin {
        // The admin list is authoritative for listed numbers.
        let current = Profile::find_access(profile_id, &deps.db_pool).await?;
        if matches!(current, Some((role, _)) if role != Role::Admin) {
            Profile::set_role(profile_id, Role::Admin, &deps.db_pool).await?;
            info!(profile_id = %profile_id, "Promoted listed admin phone");
        }
    }

    let access = resolve_role(profile_id, deps)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile {} not readable", profile_id)))?;

    if !access.is_active {
        return Err(AppError::forbidden("Account is suspended"));
    }

    let token = deps
        .jwt_service
        .create_token(profile_id, phone_number.clone(), access.role)?;

    info!(profile_id = %profile_id, role = %access.role, "OTP verified");

    Ok(Session {
        token,
        profile_id,
        role: access.role,
        redirect_to: dashboard_path(access.role).to_string(),
        is_new_profile,
    })
}

fn too_many_attempts() -> AppError {
    AppError::TooManyRequests("Too many incorrect attempts. Request a new code.".to_string())
}
