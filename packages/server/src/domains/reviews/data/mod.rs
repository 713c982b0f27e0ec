use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use crate::domains::reviews::models::{RatingSummary, Review};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Review")]
pub struct ReviewData {
    pub id: String,
    pub booking_id: String,
    pub customer_id: String,
    pub professional_id: Option<String>,
    pub service_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_visible: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewData {
    fn from(r: Review) -> Self {
        Self {
            id: r.id.to_string(),
            booking_id: r.booking_id.to_string(),
            customer_id: r.customer_id.to_string(),
            professional_id: r.professional_id.map(|id| id.to_string()),
            service_id: r.service_id.to_string(),
            rating: i32::from(r.rating),
            comment: r.comment,
            is_visible: r.is_visible,
            is_verified: r.is_verified,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "RatingSummary")]
pub struct RatingSummaryData {
    pub average: f64,
    pub count: i32,
}

impl From<RatingSummary> for RatingSummaryData {
    fn from(s: RatingSummary) -> Self {
        Self {
            average: s.average,
            count: i32::try_from(s.count).unwrap_or(i32::MAX),
        }
    }
}
