use super::{AuthError, Capability};
use crate::common::entity_ids::ProfileId;
use crate::domains::profiles::models::Role;
use async_trait::async_trait;
use tracing::debug;

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// Actor::new(profile_id, role)
///     .can(Capability::IssueRefunds)
///     .check(deps)
///     .await?;
/// ```
pub struct Actor {
    profile_id: ProfileId,
    claimed_role: Role,
}

impl Actor {
    /// `claimed_role` comes from the session token. `check` re-reads the
    /// stored role, so a demoted or suspended admin loses access before the
    /// token expires.
    pub fn new(profile_id: ProfileId, claimed_role: Role) -> Self {
        Self {
            profile_id,
            claimed_role,
        }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor: self,
            capability,
        }
    }

    /// Require a specific role (admins pass every role check)
    pub fn has_role(self, role: Role) -> RoleBuilder {
        RoleBuilder { actor: self, role }
    }
}

pub struct CapabilityBuilder {
    actor: Actor,
    capability: Capability,
}

impl CapabilityBuilder {
    pub async fn check<D>(self, deps: &D) -> Result<(), AuthError>
    where
        D: HasAuthContext + ?Sized,
    {
        check_role(&self.actor, self.capability.required_role(), deps).await
    }
}

pub struct RoleBuilder {
    actor: Actor,
    role: Role,
}

impl RoleBuilder {
    pub async fn check<D>(self, deps: &D) -> Result<(), AuthError>
    where
        D: HasAuthContext + ?Sized,
    {
        check_role(&self.actor, self.role, deps).await
    }
}

/// Role and status as currently stored for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredAccess {
    pub role: Role,
    pub is_active: bool,
}

/// Dependencies that can look up a profile's stored access
#[async_trait]
pub trait HasAuthContext: Send + Sync {
    async fn stored_access(&self, profile_id: ProfileId) -> anyhow::Result<Option<StoredAccess>>;
}

async fn check_role<D>(actor: &Actor, required: Role, deps: &D) -> Result<(), AuthError>
where
    D: HasAuthContext + ?Sized,
{
    let stored = deps
        .stored_access(actor.profile_id)
        .await?
        .ok_or(AuthError::AuthenticationRequired)?;

    if !stored.is_active {
        return Err(AuthError::Suspended);
    }
    if stored.role != actor.claimed_role {
        debug!(
            profile_id = %actor.profile_id,
            claimed = %actor.claimed_role,
            stored = %stored.role,
            "Session role is stale, using stored role"
        );
    }
    if !stored.role.satisfies(required) {
        return Err(AuthError::RoleRequired(required));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TestDeps {
        profiles: HashMap<ProfileId, StoredAccess>,
    }

    #[async_trait]
    impl HasAuthContext for TestDeps {
        async fn stored_access(&self, profile_id: ProfileId) -> anyhow::Result<Option<StoredAccess>> {
            Ok(self.profiles.get(&profile_id).copied())
        }
    }

    fn deps_with(id: ProfileId, role: Role, is_active: bool) -> TestDeps {
        let mut profiles = HashMap::new();
        profiles.insert(id, StoredAccess { role, is_active });
        TestDeps { profiles }
    }

    #[tokio::test]
    async fn test_admin_capability_granted() {
        let id = ProfileId::new();
        let deps = deps_with(id, Role::Admin, true);

        let result = Actor::new(id, Role::Admin)
            .can(Capability::IssueRefunds)
            .check(&deps)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_customer_rejected_for_capability() {
        let id = ProfileId::new();
        let deps = deps_with(id, Role::Customer, true);

        let result = Actor::new(id, Role::Customer)
            .can(Capability::ModerateReviews)
            .check(&deps)
            .await;

        assert!(matches!(result, Err(AuthError::RoleRequired(Role::Admin))));
    }

    #[tokio::test]
    async fn test_stale_admin_claim_uses_stored_role() {
        // Token still says admin, but the profile was demoted.
        let id = ProfileId::new();
        let deps = deps_with(id, Role::Customer, true);

        let result = Actor::new(id, Role::Admin)
            .can(Capability::ManageServices)
            .check(&deps)
            .await;

        assert!(matches!(result, Err(AuthError::RoleRequired(Role::Admin))));
    }

    #[tokio::test]
    async fn test_promoted_profile_granted_before_token_refresh() {
        // Token still says customer, but the profile is now an admin.
        let id = ProfileId::new();
        let deps = deps_with(id, Role::Admin, true);

        let result = Actor::new(id, Role::Customer)
            .can(Capability::IssueRefunds)
            .check(&deps)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_suspended_profile_rejected() {
        let id = ProfileId::new();
        let deps = deps_with(id, Role::Professional, false);

        let result = Actor::new(id, Role::Professional)
            .has_role(Role::Professional)
            .check(&deps)
            .await;

        assert!(matches!(result, Err(AuthError::Suspended)));
    }

    #[tokio::test]
    async fn test_unknown_profile_rejected() {
        let deps = TestDeps {
            profiles: HashMap::new(),
        };

        let result = Actor::new(ProfileId::new(), Role::Customer)
            .has_role(Role::Customer)
            .check(&deps)
            .await;

        assert!(matches!(result, Err(AuthError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn test_admin_passes_professional_check() {
        let id = ProfileId::new();
        let deps = deps_with(id, Role::Admin, true);

        let result = Actor::new(id, Role::Admin)
            .has_role(Role::Professional)
            .check(&deps)
            .await;

        assert!(result.is_ok());
    }
}
