//! Which role may reach which route prefix.

use crate::domains::profiles::models::Role;

/// Route prefixes that require a role. Checked in order, first match wins.
const GUARDED_PREFIXES: &[(&str, Role)] = &[
    ("/api/admin", Role::Admin),
    ("/api/professional", Role::Professional),
    ("/api/customer", Role::Customer),
];

/// Outcome of matching a request path against the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Allowed,
    Unauthenticated,
    Forbidden { required: Role },
}

/// Role required for `path`, if the path is guarded.
pub fn required_role_for_path(path: &str) -> Option<Role> {
    GUARDED_PREFIXES
        .iter()
        .find(|(prefix, _)| {
            path == *prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .map(|(_, role)| *role)
}

pub fn route_access(path: &str, role: Option<Role>) -> RouteAccess {
    let Some(required) = required_role_for_path(path) else {
        return RouteAccess::Public;
    };

    match role {
        None => RouteAccess::Unauthenticated,
        Some(role) if role.satisfies(required) => RouteAccess::Allowed,
        Some(_) => RouteAccess::Forbidden { required },
    }
}

/// Landing page for a freshly signed-in user.
pub fn dashboard_path(role: Role) -> &'static str {
    match role {
        Role::Customer => "/customer/dashboard",
        Role::Professional => "/professional/dashboard",
        Role::Admin => "/admin/dashboard",
    }
}
