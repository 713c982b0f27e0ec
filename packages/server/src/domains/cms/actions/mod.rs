//! Homepage content management

use serde_json::json;
use tracing::info;

use crate::common::utils::slugify;
use crate::common::{Actor, AppError, AppResult, Capability, ProfileId};
use crate::domains::admin::models::AdminAction;
use crate::domains::cms::models::{HomepageSection, SectionContent};
use crate::domains::profiles::models::Role;
use crate::kernel::ServerDeps;

const MAX_TITLE_LEN: usize = 200;

pub async fn homepage_sections(deps: &ServerDeps) -> AppResult<Vec<HomepageSection>> {
    Ok(HomepageSection::find_active(&deps.db_pool).await?)
}

/// Admin view including hidden sections.
pub async fn all_homepage_sections(
    admin_id: ProfileId,
    admin_role: Role,
    deps: &ServerDeps,
) -> AppResult<Vec<HomepageSection>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageContent)
        .check(deps)
        .await?;
    Ok(HomepageSection::find_all(&deps.db_pool).await?)
}

pub async fn upsert_homepage_section(
    admin_id: ProfileId,
    admin_role: Role,
    slug: &str,
    content: SectionContent,
    deps: &ServerDeps,
) -> AppResult<HomepageSection> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageContent)
        .check(deps)
        .await?;

    let slug = slugify(slug);
    if slug.is_empty() {
        return Err(AppError::validation("Section slug is required"));
    }
    let content = validate_content(content)?;

    let section = HomepageSection::upsert(&slug, content, &deps.db_pool).await?;

    AdminAction::record(
        admin_id,
        "upsert_homepage_section",
        "homepage_section",
        Some(section.id.into_uuid()),
        json!({ "slug": section.slug, "is_active": section.is_active }),
        &deps.db_pool,
    )
    .await?;

    info!(slug = %section.slug, "Homepage section saved");
    Ok(section)
}

pub async fn delete_homepage_section(
    admin_id: ProfileId,
    admin_role: Role,
    slug: &str,
    deps: &ServerDeps,
) -> AppResult<HomepageSection> {
    Actor::new(admin_id, admin_role)
        .can(Capability::ManageContent)
        .check(deps)
        .await?;

    let section = HomepageSection::delete_by_slug(&slugify(slug), &deps.db_pool)
        .await?
        .ok_or(AppError::NotFound("Homepage section"))?;

    AdminAction::record(
        admin_id,
        "delete_homepage_section",
        "homepage_section",
        Some(section.id.into_uuid()),
        json!({ "slug": section.slug }),
        &deps.db_pool,
    )
    .await?;

    info!(slug = %section.slug, "Homepage section deleted");
    Ok(section)
}

fn validate_content(content: SectionContent) -> AppResult<SectionContent> {
    let title = content.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    let cta_url = content.cta_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    if let Some(url) = &cta_url {
        let relative = url.starts_with('/') && !url.starts_with("//");
        if !relative && !url.starts_with("https://") {
            return Err(AppError::validation(
                "Call-to-action link must be a site path or an https URL",
            ));
        }
    }
    if content.cta_label.is_some() != cta_url.is_some() {
        return Err(AppError::validation(
            "Call-to-action needs both a label and a link",
        ));
    }
    Ok(SectionContent {
        title,
        cta_url,
        ..content
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> SectionContent {
        SectionContent {
            title: "Trusted electricians".to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_title_required() {
        let err = validate_content(SectionContent {
            title: "   ".to_string(),
            ..content()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_cta_links() {
        let with_cta = |url: &str| SectionContent {
            cta_label: Some("Book now".to_string()),
            cta_url: Some(url.to_string()),
            ..content()
        };
        assert!(validate_content(with_cta("/services/electrical")).is_ok());
        assert!(validate_content(with_cta("https://homefix.example/offers")).is_ok());
        assert!(validate_content(with_cta("javascript:alert(1)")).is_err());
        assert!(validate_content(with_cta("//evil.example")).is_err());
    }

    #[test]
    fn test_cta_needs_label_and_link() {
        let label_only = SectionContent {
            cta_label: Some("Book now".to_string()),
            ..content()
        };
        assert!(validate_content(label_only).is_err());
    }
}
