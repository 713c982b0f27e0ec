/// Authorization for the marketplace
///
/// Two layers:
/// - `routes`: prefix-based role policy applied by the role guard middleware
/// - `Actor`: capability checks inside actions, re-validated against the
///   stored profile
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, Capability};
///
/// Actor::new(profile_id, role)
///     .can(Capability::ModerateReviews)
///     .check(deps)
///     .await?;
/// ```
mod builder;
mod capability;
mod errors;
pub mod routes;

pub use builder::{Actor, CapabilityBuilder, HasAuthContext, RoleBuilder, StoredAccess};
pub use capability::Capability;
pub use errors::AuthError;
pub use routes::{dashboard_path, route_access, RouteAccess};
