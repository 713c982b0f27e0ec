//! Integration tests for phone OTP login.
//!
//! - Codes are delivered by SMS and accepted once
//! - First sign-in creates the profile with a self-assignable role
//! - Listed admin phones always sign in as admin
//! - Wrong codes, resends and suspended accounts are refused
//! - Expired codes are refused and eventually purged

mod common;

use common::fixtures::{self, random_phone};
use common::TestHarness;
use homefix_core::common::AppError;
use homefix_core::domains::auth::actions::{send_otp, verify_otp};
use homefix_core::domains::auth::models::OtpCode;
use homefix_core::kernel::scheduled_tasks::run_otp_purge;
use homefix_core::domains::profiles::models::{Profile, Role};
use homefix_core::kernel::TestDependencies;
use test_context::test_context;

async fn request_code(ctx: &TestHarness, phone: &str) -> String {
    send_otp(phone, &ctx.deps).await.expect("send otp");
    ctx.sms.last_code_to(phone).expect("code delivered")
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_first_login_creates_customer(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;

    let session = verify_otp(&phone, &code, None, &ctx.deps).await.unwrap();

    assert!(session.is_new_profile);
    assert_eq!(session.role, Role::Customer);
    assert_eq!(session.redirect_to, "/customer/dashboard");

    let claims = ctx.deps.jwt_service.verify_token(&session.token).unwrap();
    assert_eq!(claims.profile_id, session.profile_id);
    assert_eq!(claims.role, Role::Customer);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_national_number_is_normalized(ctx: &TestHarness) {
    let phone = random_phone();
    let national = phone.trim_start_matches("+91").to_string();

    let sent = send_otp(&national, &ctx.deps).await.unwrap();
    assert_eq!(sent.phone_number, phone);
    assert!(ctx.sms.last_code_to(&phone).is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_professional_signup_and_second_login(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;
    let first = verify_otp(&phone, &code, Some(Role::Professional), &ctx.deps)
        .await
        .unwrap();
    assert_eq!(first.role, Role::Professional);
    assert_eq!(first.redirect_to, "/professional/dashboard");

    // Returning user keeps the stored role whatever they ask for
    let code = request_code(ctx, &phone).await;
    let second = verify_otp(&phone, &code, Some(Role::Customer), &ctx.deps)
        .await
        .unwrap();
    assert!(!second.is_new_profile);
    assert_eq!(second.profile_id, first.profile_id);
    assert_eq!(second.role, Role::Professional);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_role_cannot_be_requested(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;

    let session = verify_otp(&phone, &code, Some(Role::Admin), &ctx.deps)
        .await
        .unwrap();

    assert_eq!(session.role, Role::Customer);
}

#[tokio::test]
async fn test_listed_admin_phone_is_promoted() {
    let phone = random_phone();
    let ctx = TestHarness::with_dependencies(TestDependencies::new().admin_phone(&phone))
        .await
        .unwrap();

    // Existing customer profile for the listed phone
    Profile::ensure_for_phone(&phone, Role::Customer, &ctx.db_pool)
        .await
        .unwrap();

    let code = request_code(&ctx, &phone).await;
    let session = verify_otp(&phone, &code, None, &ctx.deps).await.unwrap();

    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.redirect_to, "/admin/dashboard");
    let stored = Profile::find_access(session.profile_id, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(stored, Some((Role::Admin, true)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_wrong_code_reports_remaining_attempts(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = verify_otp(&phone, wrong, None, &ctx.deps).await.unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("4 attempts remaining"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }

    // The right code still works afterwards
    assert!(verify_otp(&phone, &code, None, &ctx.deps).await.is_ok());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_code_is_single_use(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;

    verify_otp(&phone, &code, None, &ctx.deps).await.unwrap();
    let err = verify_otp(&phone, &code, None, &ctx.deps).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_resend_cooldown(ctx: &TestHarness) {
    let phone = random_phone();
    send_otp(&phone, &ctx.deps).await.unwrap();

    let err = send_otp(&phone, &ctx.deps).await.unwrap_err();

    assert!(matches!(err, AppError::TooManyRequests(_)));
    assert_eq!(
        ctx.sms
            .sent_messages()
            .iter()
            .filter(|(to, _)| to == &phone)
            .count(),
        1
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_malformed_phone_rejected(ctx: &TestHarness) {
    let err = send_otp("12345", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_suspended_profile_cannot_sign_in(ctx: &TestHarness) {
    let customer = fixtures::customer(ctx).await;
    Profile::set_active(customer.id, false, &ctx.db_pool)
        .await
        .unwrap();

    let code = request_code(ctx, &customer.phone_number).await;
    let err = verify_otp(&customer.phone_number, &code, None, &ctx.deps)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_five_wrong_codes_lock_out_the_right_one(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for attempt in 1..=4 {
        let err = verify_otp(&phone, wrong, None, &ctx.deps).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "attempt {}: {:?}", attempt, err);
    }
    let err = verify_otp(&phone, wrong, None, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::TooManyRequests(_)), "{:?}", err);

    let err = verify_otp(&phone, &code, None, &ctx.deps).await.unwrap_err();
    assert!(matches!(err, AppError::TooManyRequests(_)), "{:?}", err);
    assert!(Profile::find_by_phone(&phone, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}

/// Move every code for the phone into the past.
async fn expire_codes(ctx: &TestHarness, phone: &str, age: &str) {
    sqlx::query(&format!(
        "UPDATE otp_codes SET expires_at = NOW() - INTERVAL '{}' WHERE phone_number = $1",
        age
    ))
    .bind(phone)
    .execute(&ctx.db_pool)
    .await
    .unwrap();
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_expired_code_is_rejected(ctx: &TestHarness) {
    let phone = random_phone();
    let code = request_code(ctx, &phone).await;
    expire_codes(ctx, &phone, "1 minute").await;

    let err = verify_otp(&phone, &code, None, &ctx.deps).await.unwrap_err();

    match err {
        AppError::Validation(msg) => assert!(msg.contains("expired"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_purge_removes_long_expired_codes(ctx: &TestHarness) {
    let stale = random_phone();
    let fresh = random_phone();
    request_code(ctx, &stale).await;
    request_code(ctx, &fresh).await;
    expire_codes(ctx, &stale, "25 hours").await;

    let removed = run_otp_purge(&ctx.db_pool).await.unwrap();

    assert!(removed >= 1);
    assert!(OtpCode::find_latest(&stale, &ctx.db_pool).await.unwrap().is_none());
    assert!(OtpCode::find_latest(&fresh, &ctx.db_pool).await.unwrap().is_some());
}
