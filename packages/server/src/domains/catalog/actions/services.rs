//! Service catalog actions

use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::common::utils::slugify;
use crate::common::{Actor, AppError, AppResult, Capability, PageArgs, ProfileId, ServiceId};
use crate::domains::admin::models::AdminAction;
use crate::domains::catalog::models::{NewService, Service, ServiceChanges, ServiceFilter};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

const MAX_SERVICE_NAME_LEN: usize = 120;

/// Public listing: active services only, whatever the filter says.
pub async fn list_services(
    mut filter: ServiceFilter,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Service>> {
    filter.include_inactive = false;
    filter.search = filter
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
        if min > max {
            return Err(AppError::validation("Minimum price cannot exceed maximum price"));
        }
    }
    Ok(Service::list(&filter, page, &deps.db_pool).await?)
}

/// Admin listing including deactivated services.
pub async fn list_all_services(
    admin_id: ProfileId,
    admin_role: Role,
    page: PageArgs,
    deps: &ServerDeps,
) -> AppResult<Vec<Service>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageServices)
        .check(deps)
        .await?;

    let filter = ServiceFilter {
        include_inactive: true,
        ..Default::default()
    };
    Ok(Service::list(&filter, page, &deps.db_pool).await?)
}

/// Inactive services are hidden from the public.
pub async fn get_service(service_id: ServiceId, deps: &ServerDeps) -> AppResult<Service> {
    match Service::find_by_id(service_id, &deps.db_pool).await? {
        Some(service) if service.is_active => Ok(service),
        _ => Err(AppError::NotFound("Service")),
    }
}

pub async fn get_service_by_slug(slug: &str, deps: &ServerDeps) -> AppResult<Service> {
    match Service::find_by_slug(slug, &deps.db_pool).await? {
        Some(service) if service.is_active => Ok(service),
        _ => Err(AppError::NotFound("Service")),
    }
}

pub async fn service_categories(deps: &ServerDeps) -> AppResult<Vec<String>> {
    Ok(Service::categories(&deps.db_pool).await?)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_service(
    admin_id: ProfileId,
    admin_role: Role,
    name: &str,
    category: &str,
    description: Option<String>,
    base_price: Decimal,
    duration_minutes: i32,
    image_url: Option<String>,
    deps: &ServerDeps,
) -> AppResult<Service> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageServices)
        .check(deps)
        .await?;

    let name = validate_name(name)?;
    let category = validate_category(category)?;
    validate_price(base_price)?;
    validate_duration(duration_minutes)?;

    let slug = unique_slug(&name, deps).await?;
    let service = Service::create(
        NewService::builder()
            .name(name)
            .slug(slug)
            .category(category)
            .description(description)
            .base_price(base_price)
            .duration_minutes(duration_minutes)
            .image_url(image_url)
            .build(),
        &deps.db_pool,
    )
    .await?;

    AdminAction::record(
        admin_id,
        "create_service",
        "service",
        Some(service.id.into_uuid()),
        json!({ "name": service.name, "base_price": service.base_price }),
        &deps.db_pool,
    )
    .await?;

    info!(service_id = %service.id, slug = %service.slug, "Service created");
    Ok(service)
}

pub async fn update_service(
    admin_id: ProfileId,
    admin_role: Role,
    service_id: ServiceId,
    changes: ServiceChanges,
    deps: &ServerDeps,
) -> AppResult<Service> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageServices)
        .check(deps)
        .await?;

    let changes = ServiceChanges {
        name: changes.name.as_deref().map(validate_name).transpose()?,
        category: changes.category.as_deref().map(validate_category).transpose()?,
        ..changes
    };
    if let Some(price) = changes.base_price {
        validate_price(price)?;
    }
    if let Some(duration) = changes.duration_minutes {
        validate_duration(duration)?;
    }

    let details = json!({
        "name": changes.name,
        "category": changes.category,
        "base_price": changes.base_price,
        "duration_minutes": changes.duration_minutes,
    });
    let service = Service::update(service_id, changes, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Service"))?;

    AdminAction::record(
        admin_id,
        "update_service",
        "service",
        Some(service_id.into_uuid()),
        details,
        &deps.db_pool,
    )
    .await?;

    Ok(service)
}

pub async fn set_service_active(
    admin_id: ProfileId,
    admin_role: Role,
    service_id: ServiceId,
    is_active: bool,
    deps: &ServerDeps,
) -> AppResult<Service> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageServices)
        .check(deps)
        .await?;

    let service = Service::set_active(service_id, is_active, &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Service"))?;

    AdminAction::record(
        admin_id,
        if is_active { "activate_service" } else { "deactivate_service" },
        "service",
        Some(service_id.into_uuid()),
        json!({}),
        &deps.db_pool,
    )
    .await?;

    Ok(service)
}

/// `slugify(name)`, suffixed with `-2`, `-3`, ... until unused.
async fn unique_slug(name: &str, deps: &ServerDeps) -> AppResult<String> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(AppError::validation("Service name must contain letters or digits"));
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while Service::slug_exists(&candidate, &deps.db_pool).await? {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    Ok(candidate)
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_SERVICE_NAME_LEN {
        return Err(AppError::validation(format!(
            "Service name must be 1-{} characters",
            MAX_SERVICE_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_category(category: &str) -> AppResult<String> {
    let category = category.trim().to_lowercase();
    if category.is_empty() {
        return Err(AppError::validation("Category is required"));
    }
    Ok(category)
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::validation("Price must be greater than zero"));
    }
    if price.normalize().scale() > 2 {
        return Err(AppError::validation("Price can have at most two decimal places"));
    }
    Ok(())
}

fn validate_duration(minutes: i32) -> AppResult<()> {
    if minutes <= 0 {
        return Err(AppError::validation("Duration must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_validation() {
        assert!(validate_price(Decimal::from_str("499.00").unwrap()).is_ok());
        assert!(validate_price(Decimal::ZERO).is_err());
        assert!(validate_price(Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_price(Decimal::from_str("10.999").unwrap()).is_err());
    }

    #[test]
    fn test_duration_validation() {
        assert!(validate_duration(60).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-30).is_err());
    }

    #[test]
    fn test_category_is_normalized() {
        assert_eq!(validate_category("  Cleaning ").unwrap(), "cleaning");
        assert!(validate_category("   ").is_err());
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name(" AC Repair ").unwrap(), "AC Repair");
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }
}
