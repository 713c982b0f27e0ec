use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::common::auth::{route_access, RouteAccess};
use crate::common::AppError;
use crate::domains::auth::actions::resolve_role;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// Enforce the route-prefix role policy for REST dashboard routes.
///
/// Runs after `jwt_auth_middleware`. The decision uses the role stored on
/// the profile, so a demoted or suspended user is refused even while
/// their token is still valid.
pub async fn role_guard_middleware(
    State(deps): State<Arc<ServerDeps>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if route_access(&path, None) == RouteAccess::Public {
        return next.run(request).await;
    }

    let Some(user) = request.extensions().get::<AuthUser>().cloned() else {
        return AppError::Unauthenticated.into_response();
    };

    let stored = match resolve_role(user.profile_id, &deps).await {
        Ok(Some(stored)) => stored,
        Ok(None) => return AppError::Unauthenticated.into_response(),
        Err(e) => return e.into_response(),
    };
    if !stored.is_active {
        return AppError::forbidden("Account is suspended").into_response();
    }

    match route_access(&path, Some(stored.role)) {
        RouteAccess::Allowed | RouteAccess::Public => next.run(request).await,
        RouteAccess::Unauthenticated => AppError::Unauthenticated.into_response(),
        RouteAccess::Forbidden { required } => {
            debug!(profile_id = %user.profile_id, path = %path, required = %required, "Route access denied");
            AppError::forbidden(format!("{} access required", required.label())).into_response()
        }
    }
}
