//! Send OTP action

use chrono::{Duration, Utc};
use tracing::{error, info, warn};

use crate::common::utils::{mask_phone, normalize_phone};
use crate::common::{AppError, AppResult};
use crate::domains::auth::models::{
    generate_code, is_test_identifier, render_otp_message, OtpCode, TEST_CODE,
};
use crate::domains::auth::types::OtpSent;
use crate::kernel::ServerDeps;

/// Issue a fresh login code for `raw_phone` and text it.
///
/// Outstanding codes for the phone are invalidated first, so only the newest
/// code can be verified. If delivery fails the stored code is deleted.
pub async fn send_otp(raw_phone: &str, deps: &ServerDeps) -> AppResult<OtpSent> {
    // Production safety check - test identifier should never be enabled in production
    if deps.test_identifier_enabled && !cfg!(debug_assertions) {
        error!("SECURITY WARNING: TEST_IDENTIFIER_ENABLED is true in production build!");
    }

    let phone_number = normalize_phone(raw_phone, &deps.default_country_code)
        .map_err(|e| AppError::validation(e.to_string()))?;
    let policy = deps.otp_policy;

    if let Some(latest) = OtpCode::find_latest(&phone_number, &deps.db_pool).await? {
        let wait_until = latest.created_at + Duration::seconds(policy.resend_cooldown_seconds);
        let now = Utc::now();
        if latest.verified_at.is_none() && now < wait_until {
            let seconds = (wait_until - now).num_seconds().max(1);
            return Err(AppError::TooManyRequests(format!(
                "Please wait {} seconds before requesting a new code",
                seconds
            )));
        }
    }

    OtpCode::invalidate_active(&phone_number, &deps.db_pool).await?;

    let is_test = deps.test_identifier_enabled && is_test_identifier(&phone_number);
    let code = if is_test {
        TEST_CODE.to_string()
    } else {
        generate_code()
    };

    let otp = OtpCode::create(&phone_number, &code, &policy, &deps.db_pool).await?;

    // TEST IDENTIFIER BYPASS: code is fixed, nothing to deliver
    if is_test {
        info!("Test identifier: skipping SMS for {}", mask_phone(&phone_number));
        return Ok(sent(phone_number, policy.ttl_minutes));
    }

    let message = render_otp_message(&code, &deps.app_name, policy.ttl_minutes);
    if let Err(e) = deps.sms.send_sms(&phone_number, &message).await {
        error!(phone = %mask_phone(&phone_number), error = %e, "Failed to send OTP");
        if let Err(cleanup) = OtpCode::delete(otp.id, &deps.db_pool).await {
            warn!(error = %cleanup, "Failed to delete undelivered OTP");
        }
        return Err(AppError::Upstream(
            "Could not send the verification code. Try again shortly.".to_string(),
        ));
    }

    info!(phone = %mask_phone(&phone_number), "OTP sent");
    Ok(sent(phone_number, policy.ttl_minutes))
}

fn sent(phone_number: String, ttl_minutes: i64) -> OtpSent {
    OtpSent {
        phone_number,
        expires_in_seconds: ttl_minutes * 60,
    }
}
