use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use crate::domains::disputes::models::{Dispute, DisputeStatus};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Dispute")]
pub struct DisputeData {
    pub id: String,
    pub booking_id: String,
    pub raised_by: String,
    pub reason: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Dispute> for DisputeData {
    fn from(d: Dispute) -> Self {
        Self {
            id: d.id.to_string(),
            booking_id: d.booking_id.to_string(),
            raised_by: d.raised_by.to_string(),
            reason: d.reason,
            status: d.status,
            resolution: d.resolution,
            resolved_at: d.resolved_at,
            created_at: d.created_at,
        }
    }
}
