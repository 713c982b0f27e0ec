//! Admin authorization through the GraphQL schema.
//!
//! Each admin operation is checked three ways:
//! 1. as an admin it succeeds (and leaves an audit entry for mutations)
//! 2. as a signed-in non-admin it fails with `FORBIDDEN`
//! 3. anonymously it fails with `UNAUTHENTICATED`
//!
//! Authorization reads the stored profile, so stale tokens are covered too.

mod common;

use common::fixtures::{self, auth_user};
use common::TestHarness;
use homefix_core::domains::profiles::models::{Profile, Role};
use test_context::test_context;

const ADMIN_STATS: &str = "query { adminStats { totalBookings openDisputes bookingsByStatus { status count } } }";

// ============================================================================
// Stats and audit log
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_stats_as_admin_succeeds(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;

    let result = ctx.graphql_as(&auth_user(&admin)).execute(ADMIN_STATS).await;

    assert!(result.is_ok(), "{:?}", result.errors);
    // Every status is reported, zero-filled
    let by_status = result.get("adminStats.bookingsByStatus");
    assert_eq!(by_status.as_array().map(Vec::len), Some(6));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_stats_as_customer_fails(ctx: &TestHarness) {
    let customer = fixtures::customer(ctx).await;

    let result = ctx.graphql_as(&auth_user(&customer)).execute(ADMIN_STATS).await;

    assert_eq!(result.error_code().as_deref(), Some("FORBIDDEN"));
    assert_eq!(result.error_message().as_deref(), Some("Admin access required"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_stats_unauthenticated_fails(ctx: &TestHarness) {
    let result = ctx.graphql().execute(ADMIN_STATS).await;

    assert_eq!(result.error_code().as_deref(), Some("UNAUTHENTICATED"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_demoted_admin_token_is_refused(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;
    let token_user = auth_user(&admin);
    Profile::set_role(admin.id, Role::Customer, &ctx.db_pool)
        .await
        .unwrap();

    let result = ctx.graphql_as(&token_user).execute(ADMIN_STATS).await;

    assert_eq!(result.error_code().as_deref(), Some("FORBIDDEN"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_promoted_profile_is_admin_before_token_refresh(ctx: &TestHarness) {
    let customer = fixtures::customer(ctx).await;
    let token_user = auth_user(&customer);
    Profile::set_role(customer.id, Role::Admin, &ctx.db_pool)
        .await
        .unwrap();

    let result = ctx.graphql_as(&token_user).execute(ADMIN_STATS).await;

    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(token_user.role, Role::Customer);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_suspended_admin_is_refused(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;
    Profile::set_active(admin.id, false, &ctx.db_pool)
        .await
        .unwrap();

    let result = ctx.graphql_as(&auth_user(&admin)).execute(ADMIN_STATS).await;

    assert_eq!(result.error_code().as_deref(), Some("FORBIDDEN"));
    assert_eq!(result.error_message().as_deref(), Some("Account is suspended"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_suspending_profile_is_audited(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;
    let target = fixtures::customer(ctx).await;
    let client = ctx.graphql_as(&auth_user(&admin));

    let result = client
        .execute(&format!(
            r#"mutation {{ setProfileActive(id: "{}", isActive: false, reason: "Abusive messages") {{ isActive }} }}"#,
            target.id
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("setProfileActive.isActive"), false);

    let log = client
        .query(&format!(
            r#"query {{ adminActions(targetId: "{}") {{ action targetType adminId details }} }}"#,
            target.id
        ))
        .await;
    let entries = log["adminActions"].as_array().cloned().unwrap_or_default();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "suspend_profile");
    assert_eq!(entries[0]["targetType"], "profile");
    assert_eq!(entries[0]["adminId"], admin.id.to_string());
    assert!(entries[0]["details"]
        .as_str()
        .is_some_and(|d| d.contains("Abusive messages")));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_admin_cannot_suspend_self(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;

    let result = ctx
        .graphql_as(&auth_user(&admin))
        .execute(&format!(
            r#"mutation {{ setProfileActive(id: "{}", isActive: false) {{ isActive }} }}"#,
            admin.id
        ))
        .await;

    assert_eq!(result.error_code().as_deref(), Some("VALIDATION"));
}

// ============================================================================
// Catalog management
// ============================================================================

fn create_service_mutation(name: &str) -> String {
    format!(
        r#"mutation {{
            createService(input: {{ name: "{}", category: "plumbing", basePrice: 349.0, durationMinutes: 60 }}) {{
                id slug basePrice isActive
            }}
        }}"#,
        name
    )
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_create_service_as_admin_succeeds(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;
    let name = format!("Tap Repair {}", fixtures::random_phone());

    let result = ctx
        .graphql_as(&auth_user(&admin))
        .execute(&create_service_mutation(&name))
        .await;

    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(result.get("createService.basePrice"), 349.0);
    assert_eq!(result.get("createService.isActive"), true);
    let slug = result.get("createService.slug");
    assert!(slug.as_str().is_some_and(|s| s.starts_with("tap-repair-")));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_create_service_as_professional_fails(ctx: &TestHarness) {
    let pro = fixtures::profile(ctx, Role::Professional).await;

    let result = ctx
        .graphql_as(&auth_user(&pro))
        .execute(&create_service_mutation("Tap Repair"))
        .await;

    assert_eq!(result.error_code().as_deref(), Some("FORBIDDEN"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_create_service_unauthenticated_fails(ctx: &TestHarness) {
    let result = ctx
        .graphql()
        .execute(&create_service_mutation("Tap Repair"))
        .await;

    assert_eq!(result.error_code().as_deref(), Some("UNAUTHENTICATED"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_verified_professional_becomes_listed(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;
    let service = fixtures::service(ctx, "299.00").await;
    let pro = fixtures::profile(ctx, Role::Professional).await;
    homefix_core::domains::catalog::models::ProfessionalService::add(
        pro.id,
        service.id,
        &ctx.db_pool,
    )
    .await
    .unwrap();

    let listing = format!(
        r#"query {{ professionalsForService(serviceId: "{}") {{ id }} }}"#,
        service.id
    );
    let before = ctx.graphql().query(&listing).await;
    assert_eq!(before["professionalsForService"].as_array().map(Vec::len), Some(0));

    let result = ctx
        .graphql_as(&auth_user(&admin))
        .execute(&format!(
            r#"mutation {{ verifyProfessional(id: "{}", isVerified: true) {{ isVerified }} }}"#,
            pro.id
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);

    let after = ctx.graphql().query(&listing).await;
    assert_eq!(after["professionalsForService"][0]["id"], pro.id.to_string());
}

// ============================================================================
// Homepage content
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_homepage_section_lifecycle(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;
    let client = ctx.graphql_as(&auth_user(&admin));
    let slug = format!("Monsoon Offers {}", fixtures::random_phone());

    let result = client
        .execute(&format!(
            r#"mutation {{
                upsertHomepageSection(slug: "{}", input: {{
                    title: "Monsoon offers", ctaLabel: "Book now", ctaUrl: "/services/waterproofing", position: 1
                }}) {{ slug title isActive }}
            }}"#,
            slug
        ))
        .await;
    assert!(result.is_ok(), "{:?}", result.errors);
    let stored_slug = result.get("upsertHomepageSection.slug");
    let stored_slug = stored_slug.as_str().unwrap().to_string();
    assert!(stored_slug.starts_with("monsoon-offers-"));

    // Visible to anonymous visitors
    let public = ctx
        .graphql()
        .query("query { homepageSections { slug } }")
        .await;
    let slugs: Vec<String> = public["homepageSections"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["slug"].as_str().map(str::to_string))
        .collect();
    assert!(slugs.contains(&stored_slug));

    let deleted = client
        .execute(&format!(
            r#"mutation {{ deleteHomepageSection(slug: "{}") }}"#,
            stored_slug
        ))
        .await;
    assert!(deleted.is_ok(), "{:?}", deleted.errors);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_homepage_section_rejects_script_link(ctx: &TestHarness) {
    let admin = fixtures::admin(ctx).await;

    let result = ctx
        .graphql_as(&auth_user(&admin))
        .execute(
            r#"mutation {
                upsertHomepageSection(slug: "bad-link", input: {
                    title: "Click me", ctaLabel: "Go", ctaUrl: "javascript:alert(1)"
                }) { slug }
            }"#,
        )
        .await;

    assert_eq!(result.error_code().as_deref(), Some("VALIDATION"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_homepage_upsert_as_customer_fails(ctx: &TestHarness) {
    let customer = fixtures::customer(ctx).await;

    let result = ctx
        .graphql_as(&auth_user(&customer))
        .execute(r#"mutation { upsertHomepageSection(slug: "hero", input: { title: "Hi" }) { slug } }"#)
        .await;

    assert_eq!(result.error_code().as_deref(), Some("FORBIDDEN"));
}

// ============================================================================
// Self-service
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_me_requires_session(ctx: &TestHarness) {
    let anonymous = ctx.graphql().execute("query { me { id } }").await;
    assert_eq!(anonymous.error_code().as_deref(), Some("UNAUTHENTICATED"));

    let customer = fixtures::customer(ctx).await;
    let me = ctx
        .graphql_as(&auth_user(&customer))
        .query("query { me { id role phoneNumber } }")
        .await;
    assert_eq!(me["me"]["id"], customer.id.to_string());
    assert_eq!(me["me"]["role"], "CUSTOMER");
}
