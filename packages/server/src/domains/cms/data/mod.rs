use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::domains::cms::models::{HomepageSection, SectionContent};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "HomepageSection")]
pub struct HomepageSectionData {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<HomepageSection> for HomepageSectionData {
    fn from(s: HomepageSection) -> Self {
        Self {
            id: s.id.to_string(),
            slug: s.slug,
            title: s.title,
            subtitle: s.subtitle,
            body: s.body,
            image_url: s.image_url,
            cta_label: s.cta_label,
            cta_url: s.cta_url,
            position: s.position,
            is_active: s.is_active,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct HomepageSectionInput {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<HomepageSectionInput> for SectionContent {
    fn from(input: HomepageSectionInput) -> Self {
        Self {
            title: input.title,
            subtitle: input.subtitle,
            body: input.body,
            image_url: input.image_url,
            cta_label: input.cta_label,
            cta_url: input.cta_url,
            position: input.position.unwrap_or(0),
            is_active: input.is_active.unwrap_or(true),
        }
    }
}
