//! GraphQL schema definition.
//!
//! Resolvers are thin: parse ids, call the domain action with the caller's
//! identity, convert the result into a `data` type. Errors surface as
//! `AppError`, which juniper turns into a field error with `extensions.code`.

use chrono::{DateTime, Utc};
use juniper::{EmptySubscription, RootNode};

use super::context::{parse_id, GraphQLContext};
use crate::common::{AppError, AppResult, PageArgs};

// Domain actions
use crate::domains::admin::actions as admin_actions;
use crate::domains::bookings::actions as booking_actions;
use crate::domains::catalog::actions as catalog_actions;
use crate::domains::cms::actions as cms_actions;
use crate::domains::disputes::actions as dispute_actions;
use crate::domains::notifications::actions as notification_actions;
use crate::domains::payments::actions as payment_actions;
use crate::domains::profiles::actions as profile_actions;
use crate::domains::reviews::actions as review_actions;

// Domain data types (GraphQL types)
use crate::domains::admin::data::{AdminActionData, AdminStatsData};
use crate::domains::bookings::data::{BookingData, CreateBookingInput};
use crate::domains::catalog::data::{
    f64_to_decimal, CreateServiceInput, ServiceData, ServiceFilterInput, SlotData,
    UpdateServiceInput,
};
use crate::domains::cms::data::{HomepageSectionData, HomepageSectionInput};
use crate::domains::disputes::data::DisputeData;
use crate::domains::notifications::data::NotificationData;
use crate::domains::payments::data::PaymentData;
use crate::domains::profiles::data::{
    DocumentData, ProfessionalData, ProfileData, UpdateProfileInput,
};
use crate::domains::reviews::data::{RatingSummaryData, ReviewData};

// Enums used as arguments
use crate::domains::bookings::models::BookingStatus;
use crate::domains::disputes::models::DisputeStatus;
use crate::domains::profiles::models::Role;
use crate::domains::reviews::models::ReviewSubject;

fn convert<T, D: From<T>>(items: Vec<T>) -> Vec<D> {
    items.into_iter().map(D::from).collect()
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Profiles
    // =========================================================================

    /// The signed-in profile
    async fn me(ctx: &GraphQLContext) -> AppResult<ProfileData> {
        let user = ctx.require_auth()?;
        let profile = profile_actions::get_profile(user.profile_id, ctx.deps()).await?;
        Ok(profile.into())
    }

    /// Public view of an active professional
    async fn professional(ctx: &GraphQLContext, id: String) -> AppResult<ProfessionalData> {
        let profile =
            profile_actions::get_professional(parse_id(&id, "professional")?, ctx.deps()).await?;
        Ok(profile.into())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    async fn services(
        ctx: &GraphQLContext,
        filter: Option<ServiceFilterInput>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<ServiceData>> {
        let filter = filter.unwrap_or_default().try_into()?;
        let services =
            catalog_actions::list_services(filter, PageArgs::new(limit, offset), ctx.deps())
                .await?;
        Ok(convert(services))
    }

    async fn service(ctx: &GraphQLContext, id: String) -> AppResult<ServiceData> {
        let service = catalog_actions::get_service(parse_id(&id, "service")?, ctx.deps()).await?;
        Ok(service.into())
    }

    async fn service_by_slug(ctx: &GraphQLContext, slug: String) -> AppResult<ServiceData> {
        let service = catalog_actions::get_service_by_slug(&slug, ctx.deps()).await?;
        Ok(service.into())
    }

    async fn service_categories(ctx: &GraphQLContext) -> AppResult<Vec<String>> {
        Ok(catalog_actions::service_categories(ctx.deps()).await?)
    }

    /// Verified, active professionals offering a service
    async fn professionals_for_service(
        ctx: &GraphQLContext,
        service_id: String,
    ) -> AppResult<Vec<ProfessionalData>> {
        let pros = catalog_actions::professionals_for_service(
            parse_id(&service_id, "service")?,
            ctx.deps(),
        )
        .await?;
        Ok(convert(pros))
    }

    /// Open slots for a professional (next 7 days by default)
    async fn available_slots(
        ctx: &GraphQLContext,
        professional_id: String,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<SlotData>> {
        let slots = catalog_actions::available_slots(
            parse_id(&professional_id, "professional")?,
            from,
            to,
            ctx.deps(),
        )
        .await?;
        Ok(convert(slots))
    }

    async fn my_slots(ctx: &GraphQLContext) -> AppResult<Vec<SlotData>> {
        let user = ctx.require_auth()?;
        Ok(convert(catalog_actions::my_slots(user.profile_id, ctx.deps()).await?))
    }

    async fn my_services(ctx: &GraphQLContext) -> AppResult<Vec<ServiceData>> {
        let user = ctx.require_auth()?;
        Ok(convert(catalog_actions::my_services(user.profile_id, ctx.deps()).await?))
    }

    async fn my_documents(ctx: &GraphQLContext) -> AppResult<Vec<DocumentData>> {
        let user = ctx.require_auth()?;
        Ok(convert(profile_actions::my_documents(user.profile_id, ctx.deps()).await?))
    }

    // =========================================================================
    // Bookings & payments
    // =========================================================================

    async fn my_bookings(
        ctx: &GraphQLContext,
        status: Option<BookingStatus>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<BookingData>> {
        let user = ctx.require_auth()?;
        let bookings = booking_actions::my_bookings(
            user.profile_id,
            user.role,
            status,
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(bookings))
    }

    async fn booking(ctx: &GraphQLContext, id: String) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::booking(
            user.profile_id,
            user.role,
            parse_id(&id, "booking")?,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    async fn booking_payment(
        ctx: &GraphQLContext,
        booking_id: String,
    ) -> AppResult<Option<PaymentData>> {
        let user = ctx.require_auth()?;
        let payment = payment_actions::booking_payment(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            ctx.deps(),
        )
        .await?;
        Ok(payment.map(Into::into))
    }

    async fn booking_disputes(
        ctx: &GraphQLContext,
        booking_id: String,
    ) -> AppResult<Vec<DisputeData>> {
        let user = ctx.require_auth()?;
        let disputes = dispute_actions::booking_disputes(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            ctx.deps(),
        )
        .await?;
        Ok(convert(disputes))
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    async fn reviews_for_service(
        ctx: &GraphQLContext,
        service_id: String,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<ReviewData>> {
        let subject = ReviewSubject::Service(parse_id(&service_id, "service")?);
        let reviews =
            review_actions::reviews_for(subject, PageArgs::new(limit, offset), ctx.deps()).await?;
        Ok(convert(reviews))
    }

    async fn reviews_for_professional(
        ctx: &GraphQLContext,
        professional_id: String,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<ReviewData>> {
        let subject = ReviewSubject::Professional(parse_id(&professional_id, "professional")?);
        let reviews =
            review_actions::reviews_for(subject, PageArgs::new(limit, offset), ctx.deps()).await?;
        Ok(convert(reviews))
    }

    async fn service_rating(
        ctx: &GraphQLContext,
        service_id: String,
    ) -> AppResult<RatingSummaryData> {
        let subject = ReviewSubject::Service(parse_id(&service_id, "service")?);
        Ok(review_actions::rating_summary(subject, ctx.deps()).await?.into())
    }

    async fn professional_rating(
        ctx: &GraphQLContext,
        professional_id: String,
    ) -> AppResult<RatingSummaryData> {
        let subject = ReviewSubject::Professional(parse_id(&professional_id, "professional")?);
        Ok(review_actions::rating_summary(subject, ctx.deps()).await?.into())
    }

    // =========================================================================
    // Content & notifications
    // =========================================================================

    async fn homepage_sections(ctx: &GraphQLContext) -> AppResult<Vec<HomepageSectionData>> {
        Ok(convert(cms_actions::homepage_sections(ctx.deps()).await?))
    }

    async fn my_notifications(
        ctx: &GraphQLContext,
        unread_only: Option<bool>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<NotificationData>> {
        let user = ctx.require_auth()?;
        let notifications = notification_actions::my_notifications(
            user.profile_id,
            unread_only.unwrap_or(false),
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(notifications))
    }

    async fn unread_notification_count(ctx: &GraphQLContext) -> AppResult<i32> {
        let user = ctx.require_auth()?;
        let count = notification_actions::unread_count(user.profile_id, ctx.deps()).await?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }

    // =========================================================================
    // Admin
    // =========================================================================

    async fn profiles(
        ctx: &GraphQLContext,
        role: Option<Role>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<ProfileData>> {
        let user = ctx.require_auth()?;
        let profiles = profile_actions::list_profiles(
            user.profile_id,
            user.role,
            role,
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(profiles))
    }

    /// Every service, including deactivated ones
    async fn all_services(
        ctx: &GraphQLContext,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<ServiceData>> {
        let user = ctx.require_auth()?;
        let services = catalog_actions::list_all_services(
            user.profile_id,
            user.role,
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(services))
    }

    async fn pending_documents(ctx: &GraphQLContext) -> AppResult<Vec<DocumentData>> {
        let user = ctx.require_auth()?;
        let docs =
            profile_actions::pending_documents(user.profile_id, user.role, ctx.deps()).await?;
        Ok(convert(docs))
    }

    async fn bookings(
        ctx: &GraphQLContext,
        status: Option<BookingStatus>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<BookingData>> {
        let user = ctx.require_auth()?;
        let bookings = booking_actions::list_bookings(
            user.profile_id,
            user.role,
            status,
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(bookings))
    }

    async fn reviews(
        ctx: &GraphQLContext,
        is_visible: Option<bool>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<ReviewData>> {
        let user = ctx.require_auth()?;
        let reviews = review_actions::list_reviews(
            user.profile_id,
            user.role,
            is_visible,
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(reviews))
    }

    async fn disputes(
        ctx: &GraphQLContext,
        status: Option<DisputeStatus>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> AppResult<Vec<DisputeData>> {
        let user = ctx.require_auth()?;
        let disputes = dispute_actions::list_disputes(
            user.profile_id,
            user.role,
            status,
            PageArgs::new(limit, offset),
            ctx.deps(),
        )
        .await?;
        Ok(convert(disputes))
    }

    async fn admin_stats(ctx: &GraphQLContext) -> AppResult<AdminStatsData> {
        let user = ctx.require_auth()?;
        Ok(admin_actions::admin_stats(user.profile_id, user.role, ctx.deps())
            .await?
            .into())
    }

    /// Audit log, newest first
    async fn admin_actions(
        ctx: &GraphQLContext,
        limit: Option<i32>,
        target_id: Option<String>,
    ) -> AppResult<Vec<AdminActionData>> {
        let user = ctx.require_auth()?;
        let target_id = match target_id {
            Some(raw) => Some(
                uuid::Uuid::parse_str(raw.trim())
                    .map_err(|_| AppError::validation("Invalid target id"))?,
            ),
            None => None,
        };
        let actions = admin_actions::admin_actions(
            user.profile_id,
            user.role,
            limit,
            target_id,
            ctx.deps(),
        )
        .await?;
        Ok(convert(actions))
    }

    async fn all_homepage_sections(ctx: &GraphQLContext) -> AppResult<Vec<HomepageSectionData>> {
        let user = ctx.require_auth()?;
        let sections =
            cms_actions::all_homepage_sections(user.profile_id, user.role, ctx.deps()).await?;
        Ok(convert(sections))
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Own profile & professional setup
    // =========================================================================

    async fn update_profile(
        ctx: &GraphQLContext,
        input: UpdateProfileInput,
    ) -> AppResult<ProfileData> {
        let user = ctx.require_auth()?;
        let profile =
            profile_actions::update_profile(user.profile_id, input.into(), ctx.deps()).await?;
        Ok(profile.into())
    }

    async fn offer_service(
        ctx: &GraphQLContext,
        service_id: String,
    ) -> AppResult<Vec<ServiceData>> {
        let user = ctx.require_auth()?;
        let services = catalog_actions::offer_service(
            user.profile_id,
            user.role,
            parse_id(&service_id, "service")?,
            ctx.deps(),
        )
        .await?;
        Ok(convert(services))
    }

    async fn withdraw_service(
        ctx: &GraphQLContext,
        service_id: String,
    ) -> AppResult<Vec<ServiceData>> {
        let user = ctx.require_auth()?;
        let services = catalog_actions::withdraw_service(
            user.profile_id,
            user.role,
            parse_id(&service_id, "service")?,
            ctx.deps(),
        )
        .await?;
        Ok(convert(services))
    }

    async fn add_slot(
        ctx: &GraphQLContext,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> AppResult<SlotData> {
        let user = ctx.require_auth()?;
        let slot =
            catalog_actions::add_slot(user.profile_id, user.role, starts_at, ends_at, ctx.deps())
                .await?;
        Ok(slot.into())
    }

    async fn remove_slot(ctx: &GraphQLContext, slot_id: String) -> AppResult<bool> {
        let user = ctx.require_auth()?;
        Ok(catalog_actions::remove_slot(
            user.profile_id,
            user.role,
            parse_id(&slot_id, "slot")?,
            ctx.deps(),
        )
        .await?)
    }

    /// Register an uploaded verification document by its storage key
    async fn submit_document(
        ctx: &GraphQLContext,
        document_type: String,
        storage_key: String,
    ) -> AppResult<DocumentData> {
        let user = ctx.require_auth()?;
        let doc = profile_actions::submit_document(
            user.profile_id,
            user.role,
            &document_type,
            &storage_key,
            ctx.deps(),
        )
        .await?;
        Ok(doc.into())
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    async fn create_booking(
        ctx: &GraphQLContext,
        input: CreateBookingInput,
    ) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::create_booking(
            user.profile_id,
            user.role,
            input.try_into()?,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    async fn cancel_booking(
        ctx: &GraphQLContext,
        id: String,
        reason: Option<String>,
    ) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::cancel_booking(
            user.profile_id,
            user.role,
            parse_id(&id, "booking")?,
            reason,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    async fn start_booking(ctx: &GraphQLContext, id: String) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::start_booking(
            user.profile_id,
            user.role,
            parse_id(&id, "booking")?,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    async fn complete_booking(ctx: &GraphQLContext, id: String) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::complete_booking(
            user.profile_id,
            user.role,
            parse_id(&id, "booking")?,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    // =========================================================================
    // Reviews, disputes, notifications
    // =========================================================================

    async fn create_review(
        ctx: &GraphQLContext,
        booking_id: String,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<ReviewData> {
        let user = ctx.require_auth()?;
        let review = review_actions::create_review(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            rating,
            comment,
            ctx.deps(),
        )
        .await?;
        Ok(review.into())
    }

    async fn raise_dispute(
        ctx: &GraphQLContext,
        booking_id: String,
        reason: String,
    ) -> AppResult<DisputeData> {
        let user = ctx.require_auth()?;
        let dispute = dispute_actions::raise_dispute(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            &reason,
            ctx.deps(),
        )
        .await?;
        Ok(dispute.into())
    }

    async fn mark_notification_read(
        ctx: &GraphQLContext,
        id: String,
    ) -> AppResult<NotificationData> {
        let user = ctx.require_auth()?;
        let notification = notification_actions::mark_notification_read(
            user.profile_id,
            parse_id(&id, "notification")?,
            ctx.deps(),
        )
        .await?;
        Ok(notification.into())
    }

    /// Returns how many notifications were marked
    async fn mark_all_notifications_read(ctx: &GraphQLContext) -> AppResult<i32> {
        let user = ctx.require_auth()?;
        let updated =
            notification_actions::mark_all_notifications_read(user.profile_id, ctx.deps()).await?;
        Ok(i32::try_from(updated).unwrap_or(i32::MAX))
    }

    // =========================================================================
    // Admin: catalog & profiles
    // =========================================================================

    async fn create_service(
        ctx: &GraphQLContext,
        input: CreateServiceInput,
    ) -> AppResult<ServiceData> {
        let user = ctx.require_auth()?;
        let service = catalog_actions::create_service(
            user.profile_id,
            user.role,
            &input.name,
            &input.category,
            input.description,
            f64_to_decimal(input.base_price)?,
            input.duration_minutes,
            input.image_url,
            ctx.deps(),
        )
        .await?;
        Ok(service.into())
    }

    async fn update_service(
        ctx: &GraphQLContext,
        id: String,
        input: UpdateServiceInput,
    ) -> AppResult<ServiceData> {
        let user = ctx.require_auth()?;
        let service = catalog_actions::update_service(
            user.profile_id,
            user.role,
            parse_id(&id, "service")?,
            input.try_into()?,
            ctx.deps(),
        )
        .await?;
        Ok(service.into())
    }

    async fn set_service_active(
        ctx: &GraphQLContext,
        id: String,
        is_active: bool,
    ) -> AppResult<ServiceData> {
        let user = ctx.require_auth()?;
        let service = catalog_actions::set_service_active(
            user.profile_id,
            user.role,
            parse_id(&id, "service")?,
            is_active,
            ctx.deps(),
        )
        .await?;
        Ok(service.into())
    }

    async fn set_profile_role(
        ctx: &GraphQLContext,
        id: String,
        role: Role,
    ) -> AppResult<ProfileData> {
        let user = ctx.require_auth()?;
        let profile = profile_actions::set_profile_role(
            user.profile_id,
            user.role,
            parse_id(&id, "profile")?,
            role,
            ctx.deps(),
        )
        .await?;
        Ok(profile.into())
    }

    /// Suspend (`isActive: false`) or reinstate a profile
    async fn set_profile_active(
        ctx: &GraphQLContext,
        id: String,
        is_active: bool,
        reason: Option<String>,
    ) -> AppResult<ProfileData> {
        let user = ctx.require_auth()?;
        let profile = profile_actions::set_profile_active(
            user.profile_id,
            user.role,
            parse_id(&id, "profile")?,
            is_active,
            reason,
            ctx.deps(),
        )
        .await?;
        Ok(profile.into())
    }

    async fn verify_professional(
        ctx: &GraphQLContext,
        id: String,
        is_verified: bool,
    ) -> AppResult<ProfileData> {
        let user = ctx.require_auth()?;
        let profile = profile_actions::verify_professional(
            user.profile_id,
            user.role,
            parse_id(&id, "profile")?,
            is_verified,
            ctx.deps(),
        )
        .await?;
        Ok(profile.into())
    }

    async fn review_document(
        ctx: &GraphQLContext,
        id: String,
        approve: bool,
        notes: Option<String>,
    ) -> AppResult<DocumentData> {
        let user = ctx.require_auth()?;
        let doc = profile_actions::review_document(
            user.profile_id,
            user.role,
            parse_id(&id, "document")?,
            approve,
            notes,
            ctx.deps(),
        )
        .await?;
        Ok(doc.into())
    }

    // =========================================================================
    // Admin: bookings, payments, moderation
    // =========================================================================

    async fn assign_professional(
        ctx: &GraphQLContext,
        booking_id: String,
        professional_id: String,
    ) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::assign_professional(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            parse_id(&professional_id, "professional")?,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    async fn transition_booking(
        ctx: &GraphQLContext,
        booking_id: String,
        status: BookingStatus,
        reason: Option<String>,
    ) -> AppResult<BookingData> {
        let user = ctx.require_auth()?;
        let booking = booking_actions::transition_booking(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            status,
            reason,
            ctx.deps(),
        )
        .await?;
        Ok(booking.into())
    }

    /// Refund a paid booking; omit `amount` for a full refund
    async fn refund_booking(
        ctx: &GraphQLContext,
        booking_id: String,
        amount: Option<f64>,
        reason: String,
    ) -> AppResult<PaymentData> {
        let user = ctx.require_auth()?;
        let amount = amount.map(f64_to_decimal).transpose()?;
        let payment = payment_actions::refund_booking(
            user.profile_id,
            user.role,
            parse_id(&booking_id, "booking")?,
            amount,
            &reason,
            ctx.deps(),
        )
        .await?;
        Ok(payment.into())
    }

    async fn moderate_review(
        ctx: &GraphQLContext,
        id: String,
        is_visible: Option<bool>,
        is_verified: Option<bool>,
    ) -> AppResult<ReviewData> {
        let user = ctx.require_auth()?;
        let review = review_actions::moderate_review(
            user.profile_id,
            user.role,
            parse_id(&id, "review")?,
            is_visible,
            is_verified,
            ctx.deps(),
        )
        .await?;
        Ok(review.into())
    }

    /// Close a dispute, optionally refunding the booking in full
    async fn resolve_dispute(
        ctx: &GraphQLContext,
        id: String,
        resolution: String,
        refund: Option<bool>,
        reject: Option<bool>,
    ) -> AppResult<DisputeData> {
        let user = ctx.require_auth()?;
        let dispute = dispute_actions::resolve_dispute(
            user.profile_id,
            user.role,
            parse_id(&id, "dispute")?,
            &resolution,
            refund.unwrap_or(false),
            reject.unwrap_or(false),
            ctx.deps(),
        )
        .await?;
        Ok(dispute.into())
    }

    // =========================================================================
    // Admin: homepage
    // =========================================================================

    async fn upsert_homepage_section(
        ctx: &GraphQLContext,
        slug: String,
        input: HomepageSectionInput,
    ) -> AppResult<HomepageSectionData> {
        let user = ctx.require_auth()?;
        let section = cms_actions::upsert_homepage_section(
            user.profile_id,
            user.role,
            &slug,
            input.into(),
            ctx.deps(),
        )
        .await?;
        Ok(section.into())
    }

    async fn delete_homepage_section(ctx: &GraphQLContext, slug: String) -> AppResult<bool> {
        let user = ctx.require_auth()?;
        cms_actions::delete_homepage_section(user.profile_id, user.role, &slug, ctx.deps())
            .await?;
        Ok(true)
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
