//! Test fixtures for creating test data.
//!
//! Profiles, services and slots go straight through the models; bookings
//! and payments go through the actions so their invariants hold.

use chrono::{DateTime, Duration, Utc};
use homefix_core::domains::bookings::actions::{create_booking, BookingRequest};
use homefix_core::domains::bookings::models::Booking;
use homefix_core::domains::catalog::models::{
    AvailabilitySlot, NewService, ProfessionalService, Service,
};
use homefix_core::domains::payments::actions::{create_order, verify_payment, PaymentConfirmation};
use homefix_core::domains::profiles::models::{Profile, Role};
use homefix_core::kernel::test_dependencies::MockPaymentGateway;
use homefix_core::server::middleware::AuthUser;
use rand::Rng;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::TestHarness;

/// A fresh Indian mobile number, unique across test runs in practice.
pub fn random_phone() -> String {
    let n: u64 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("+919{:09}", n)
}

fn suffix() -> String {
    format!("{:08x}", rand::thread_rng().gen::<u32>())
}

pub fn money(amount: &str) -> Decimal {
    Decimal::from_str(amount).expect("valid decimal")
}

pub async fn profile(ctx: &TestHarness, role: Role) -> Profile {
    let phone = random_phone();
    let (id, _) = Profile::ensure_for_phone(&phone, role, &ctx.db_pool)
        .await
        .expect("create profile");
    Profile::find_by_id(id, &ctx.db_pool)
        .await
        .expect("load profile")
        .expect("profile exists")
}

pub async fn customer(ctx: &TestHarness) -> Profile {
    profile(ctx, Role::Customer).await
}

pub async fn admin(ctx: &TestHarness) -> Profile {
    profile(ctx, Role::Admin).await
}

/// Verified professional offering `service`.
pub async fn professional(ctx: &TestHarness, service: &Service) -> Profile {
    let pro = profile(ctx, Role::Professional).await;
    let pro = Profile::set_verified(pro.id, true, &ctx.db_pool)
        .await
        .expect("verify professional")
        .expect("professional exists");
    ProfessionalService::add(pro.id, service.id, &ctx.db_pool)
        .await
        .expect("offer service");
    pro
}

pub async fn service(ctx: &TestHarness, price: &str) -> Service {
    let tag = suffix();
    Service::create(
        NewService::builder()
            .name(format!("Deep Cleaning {}", tag))
            .slug(format!("deep-cleaning-{}", tag))
            .category("cleaning")
            .base_price(money(price))
            .duration_minutes(120)
            .build(),
        &ctx.db_pool,
    )
    .await
    .expect("create service")
}

/// Two-hour slot starting `hours_ahead` hours from now.
pub async fn slot(ctx: &TestHarness, pro: &Profile, hours_ahead: i64) -> AvailabilitySlot {
    let starts_at: DateTime<Utc> = Utc::now() + Duration::hours(hours_ahead);
    AvailabilitySlot::create(pro.id, starts_at, starts_at + Duration::hours(2), &ctx.db_pool)
        .await
        .expect("create slot")
}

pub fn auth_user(profile: &Profile) -> AuthUser {
    AuthUser {
        profile_id: profile.id,
        phone_number: profile.phone_number.clone(),
        role: profile.role,
    }
}

pub fn booking_request(service: &Service, slot: &AvailabilitySlot) -> BookingRequest {
    BookingRequest {
        service_id: service.id,
        professional_id: None,
        slot_id: Some(slot.id),
        scheduled_at: None,
        address: "12 MG Road, Bengaluru".to_string(),
        notes: None,
    }
}

/// Everything needed to walk a booking through its lifecycle.
pub struct BookedJob {
    pub customer: Profile,
    pub professional: Profile,
    pub service: Service,
    pub slot: AvailabilitySlot,
    pub booking: Booking,
}

/// Customer books a fresh professional's slot. Booking is pending.
pub async fn pending_booking(ctx: &TestHarness, price: &str) -> BookedJob {
    let service = service(ctx, price).await;
    let professional = professional(ctx, &service).await;
    let slot = slot(ctx, &professional, 48).await;
    let customer = customer(ctx).await;

    let booking = create_booking(
        customer.id,
        customer.role,
        booking_request(&service, &slot),
        &ctx.deps,
    )
    .await
    .expect("create booking");

    BookedJob {
        customer,
        professional,
        service,
        slot,
        booking,
    }
}

/// Run checkout for the job's booking and confirm it with a signed,
/// captured gateway payment. Returns the gateway payment id.
pub async fn pay(ctx: &TestHarness, job: &BookedJob) -> (String, PaymentConfirmation) {
    let order = create_order(job.customer.id, job.customer.role, job.booking.id, &ctx.deps)
        .await
        .expect("create order");
    let payment_id = format!("pay_{}", suffix());
    ctx.gateway
        .add_payment(&payment_id, &order.order_id, order.amount_minor, "captured");
    let signature = MockPaymentGateway::sign_payment(&order.order_id, &payment_id);

    let confirmation = verify_payment(
        job.customer.id,
        job.customer.role,
        &order.order_id,
        &payment_id,
        &signature,
        &ctx.deps,
    )
    .await
    .expect("verify payment");

    (payment_id, confirmation)
}

/// Pending booking that has been paid (confirmed).
pub async fn confirmed_booking(ctx: &TestHarness, price: &str) -> BookedJob {
    let mut job = pending_booking(ctx, price).await;
    pay(ctx, &job).await;
    job.booking = reload(ctx, &job.booking).await;
    job
}

pub async fn reload(ctx: &TestHarness, booking: &Booking) -> Booking {
    Booking::find_by_id(booking.id, &ctx.db_pool)
        .await
        .expect("load booking")
        .expect("booking exists")
}
