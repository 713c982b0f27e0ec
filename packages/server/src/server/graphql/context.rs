use std::sync::Arc;

use crate::common::{AppError, AppResult, Id};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared dependencies plus the caller, if the request carried a valid
/// session token.
#[derive(Clone)]
pub struct GraphQLContext {
    pub deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self { deps, auth_user }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    /// The signed-in caller, or an `UNAUTHENTICATED` field error.
    pub fn require_auth(&self) -> AppResult<&AuthUser> {
        self.auth_user
            .as_ref()
            .ok_or(AppError::Unauthenticated)
    }
}

/// Parse a GraphQL `String` id into a typed id.
pub fn parse_id<T>(raw: &str, what: &str) -> AppResult<Id<T>> {
    Id::parse(raw.trim()).map_err(|_| AppError::validation(format!("Invalid {} id", what)))
}
