use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::domains::profiles::models::{
    DocumentStatus, ProfessionalDocument, Profile, ProfileChanges, Role,
};

/// Profile as seen by its owner and by admins
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Profile")]
pub struct ProfileData {
    pub id: String,
    pub phone_number: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileData {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id.to_string(),
            phone_number: p.phone_number,
            full_name: p.full_name,
            email: p.email,
            role: p.role,
            avatar_url: p.avatar_url,
            city: p.city,
            bio: p.bio,
            is_verified: p.is_verified,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

/// Public card for a professional. No contact details.
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Professional")]
pub struct ProfessionalData {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
}

impl From<Profile> for ProfessionalData {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id.to_string(),
            display_name: p
                .full_name
                .clone()
                .unwrap_or_else(|| "Professional".to_string()),
            avatar_url: p.avatar_url,
            city: p.city,
            bio: p.bio,
            is_verified: p.is_verified,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

impl From<UpdateProfileInput> for ProfileChanges {
    fn from(input: UpdateProfileInput) -> Self {
        Self {
            full_name: input.full_name,
            email: input.email,
            avatar_url: input.avatar_url,
            city: input.city,
            bio: input.bio,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "ProfessionalDocument")]
pub struct DocumentData {
    pub id: String,
    pub professional_id: String,
    pub document_type: String,
    pub storage_key: String,
    pub status: DocumentStatus,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfessionalDocument> for DocumentData {
    fn from(d: ProfessionalDocument) -> Self {
        Self {
            id: d.id.to_string(),
            professional_id: d.professional_id.to_string(),
            document_type: d.document_type,
            storage_key: d.storage_key,
            status: d.status,
            review_notes: d.review_notes,
            reviewed_at: d.reviewed_at,
            created_at: d.created_at,
        }
    }
}
