//! Review actions

use serde_json::json;
use tracing::info;

use crate::common::{Actor, AppError, AppResult, BookingId, Capability, PageArgs, ProfileId, ReviewId};
use crate::domains::admin::models::AdminAction;
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::profiles::models::Role;
use crate::domains::reviews::models::{RatingSummary, Review, ReviewSubject};
use crate::kernel::ServerDeps;

const MAX_COMMENT_LEN: usize = 2000;

/// The booking's customer reviews a completed booking, once.
pub async fn create_review(
    customer_id: ProfileId,
    role: Role,
    booking_id: BookingId,
    rating: i32,
    comment: Option<String>,
    deps: &ServerDeps,
) -> AppResult<Review> {
    Actor::new(customer_id, role)
        .has_role(Role::Customer)
        .check(deps)
        .await?;

    let (rating, comment) = validate_review(rating, comment)?;

    let booking = match Booking::find_by_id(booking_id, &deps.db_pool).await? {
        Some(b) if b.customer_id == customer_id => b,
        _ => return Err(AppError::NotFound("Booking")),
    };
    if booking.status != BookingStatus::Completed {
        return Err(AppError::validation("Only completed bookings can be reviewed"));
    }

    let review = Review::create(
        booking.id,
        customer_id,
        booking.professional_id,
        booking.service_id,
        rating,
        comment,
        &deps.db_pool,
    )
    .await?
    .ok_or_else(|| AppError::conflict("This booking has already been reviewed"))?;

    info!(review_id = %review.id, booking_id = %booking_id, rating, "Review created");
    Ok(review)
}

fn validate_review(rating: i32, comment: Option<String>) -> AppResult<(i16, Option<String>)> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if comment.as_ref().is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN) {
        return Err(AppError::validation(format!(
            "Comment must be at most {} characters",
            MAX_COMMENT_LEN
        )));
    }
    // range checked above
    Ok((rating as i16, comment))
}

pub async fn reviews_for(
    subject: ReviewSubject,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Review>> {
    Ok(Review::find_visible(subject, page, &deps.db_pool).await?)
}

pub async fn rating_summary(subject: ReviewSubject, deps: &ServerDeps) -> AppResult<RatingSummary> {
    Ok(Review::summary(subject, &deps.db_pool).await?)
}

pub async fn moderate_review(
    admin_id: ProfileId,
    admin_role: Role,
    review_id: ReviewId,
    is_visible: Option<bool>,
    is_verified: Option<bool>,
    deps: &ServerDeps,
) -> AppResult<Review> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ModerateReviews)
        .check(deps)
        .await?;

    if is_visible.is_none() && is_verified.is_none() {
        return Err(AppError::validation("Nothing to change"));
    }

    let review = Review::moderate(review_id, is_visible, is_verified, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Review"))?;

    AdminAction::record(
        admin_id,
        "moderate_review",
        "review",
        Some(review_id.into_uuid()),
        json!({ "is_visible": is_visible, "is_verified": is_verified }),
        &deps.db_pool,
    )
    .await?;

    info!(review_id = %review_id, ?is_visible, ?is_verified, "Review moderated");
    Ok(review)
}

pub async fn list_reviews(
    admin_id: ProfileId,
    admin_role: Role,
    is_visible: Option<bool>,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Review>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ModerateReviews)
        .check(deps)
        .await?;
    Ok(Review::list(is_visible, page, &deps.db_pool).await?)
}
