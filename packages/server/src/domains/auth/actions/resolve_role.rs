use tracing::warn;

use crate::common::auth::StoredAccess;
use crate::common::utils::{retry_until_some, RetryPolicy};
use crate::common::{AppResult, ProfileId};
use crate::domains::profiles::models::Profile;
use crate::kernel::ServerDeps;

/// Stored role and active flag for a profile.
///
/// A freshly inserted profile may not be readable on the first try (replica
/// lag, trigger-populated rows), so the lookup retries with backoff.
pub async fn resolve_role(
    profile_id: ProfileId,
    deps: &ServerDeps,
) -> AppResult<Option<StoredAccess>> {
    let access = retry_until_some(RetryPolicy::ROLE_LOOKUP, |_attempt| {
        Profile::find_access(profile_id, &deps.db_pool)
    })
    .await?;

    if access.is_none() {
        warn!(profile_id = %profile_id, "Profile role not found after retries");
    }

    Ok(access.map(|(role, is_active)| StoredAccess { role, is_active }))
}
