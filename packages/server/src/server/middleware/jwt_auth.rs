use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::common::{AppError, ProfileId};
use crate::domains::auth::JwtService;
use crate::domains::profiles::models::Role;

/// Session identity decoded from the bearer token.
///
/// `role` is the role at sign-in. Authorization re-reads the stored role,
/// so treat this as a hint.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub profile_id: ProfileId,
    pub phone_number: String,
    pub role: Role,
}

/// JWT authentication middleware
///
/// Verifies the bearer token and adds AuthUser to request extensions.
/// Requests without a valid token continue anonymously.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_auth_user(request.headers(), &jwt_service) {
        Some(user) => {
            debug!(profile_id = %user.profile_id, role = %user.role, "Authenticated request");
            request.extensions_mut().insert(user);
        }
        None => debug!("Anonymous request"),
    }

    next.run(request).await
}

fn extract_auth_user(headers: &axum::http::HeaderMap, jwt_service: &JwtService) -> Option<AuthUser> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return None;
    }

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        profile_id: claims.profile_id,
        phone_number: claims.phone_number,
        role: claims.role,
    })
}

/// Handlers that take `AuthUser` reject anonymous requests with 401.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
