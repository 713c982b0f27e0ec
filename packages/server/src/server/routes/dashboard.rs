//! Role-scoped dashboard endpoints. Access is enforced by the role guard
//! on the `/api/{customer,professional,admin}` prefixes.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::common::{AppResult, PageArgs};
use crate::domains::admin::actions::{admin_stats, AdminStats};
use crate::domains::bookings::actions::my_bookings;
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    pub status: Option<BookingStatus>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

/// GET /api/customer/bookings
pub async fn customer_bookings_handler(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    let page = PageArgs::new(params.limit, params.offset);
    let bookings = my_bookings(user.profile_id, Role::Customer, params.status, page, &deps).await?;
    Ok(Json(bookings))
}

/// GET /api/professional/bookings
pub async fn professional_bookings_handler(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    let page = PageArgs::new(params.limit, params.offset);
    let bookings =
        my_bookings(user.profile_id, Role::Professional, params.status, page, &deps).await?;
    Ok(Json(bookings))
}

/// GET /api/admin/stats
pub async fn admin_stats_handler(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<AdminStats>> {
    let stats = admin_stats(user.profile_id, Role::Admin, &deps).await?;
    Ok(Json(stats))
}
