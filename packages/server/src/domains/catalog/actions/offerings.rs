//! Which professionals offer which services

use tracing::info;

use crate::common::{Actor, AppError, AppResult, ProfileId, ServiceId};
use crate::domains::catalog::actions::get_service;
use crate::domains::catalog::models::{ProfessionalService, Service};
use crate::domains::profiles::models::{Profile, Role};
use crate::kernel::ServerDeps;

pub async fn offer_service(
    profile_id: ProfileId,
    role: Role,
    service_id: ServiceId,
    deps: &ServerDeps,
) -> AppResult<Vec<Service>> {
    Actor::new(profile_id, role)
        .has_role(Role::Professional)
        .check(deps)
        .await?;

    // Only active services can be offered.
    get_service(service_id, deps).await?;

    ProfessionalService::add(profile_id, service_id, &deps.db_pool).await?;
    info!(profile_id = %profile_id, service_id = %service_id, "Service offered");

    Ok(ProfessionalService::services_for(profile_id, &deps.db_pool).await?)
}

pub async fn withdraw_service(
    profile_id: ProfileId,
    role: Role,
    service_id: ServiceId,
    deps: &ServerDeps,
) -> AppResult<Vec<Service>> {
    Actor::new(profile_id, role)
        .has_role(Role::Professional)
        .check(deps)
        .await?;

    if !ProfessionalService::remove(profile_id, service_id, &deps.db_pool).await? {
        return Err(AppError::NotFound("Offered service"));
    }

    Ok(ProfessionalService::services_for(profile_id, &deps.db_pool).await?)
}

pub async fn my_services(profile_id: ProfileId, deps: &ServerDeps) -> AppResult<Vec<Service>> {
    Ok(ProfessionalService::services_for(profile_id, &deps.db_pool).await?)
}

/// Verified, active professionals offering the service.
pub async fn professionals_for_service(
    service_id: ServiceId,
    deps: &ServerDeps,
) -> AppResult<Vec<Profile>> {
    get_service(service_id, deps).await?;
    Ok(Profile::find_professionals_for_service(service_id, &deps.db_pool).await?)
}
