use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use crate::domains::admin::actions::AdminStats;
use crate::domains::admin::models::AdminAction;
use crate::domains::bookings::data::StatusCount;
use crate::domains::catalog::data::decimal_to_f64;

fn clamp_count(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "AdminStats")]
pub struct AdminStatsData {
    pub bookings_by_status: Vec<StatusCount>,
    pub total_bookings: i32,
    pub revenue: f64,
    pub customers: i32,
    pub professionals: i32,
    pub pending_documents: i32,
    pub open_disputes: i32,
}

impl From<AdminStats> for AdminStatsData {
    fn from(s: AdminStats) -> Self {
        Self {
            bookings_by_status: s
                .bookings_by_status
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status,
                    count: clamp_count(count),
                })
                .collect(),
            total_bookings: clamp_count(s.total_bookings),
            revenue: decimal_to_f64(s.revenue),
            customers: clamp_count(s.customers),
            professionals: clamp_count(s.professionals),
            pending_documents: clamp_count(s.pending_documents),
            open_disputes: clamp_count(s.open_disputes),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "AdminAction")]
pub struct AdminActionData {
    pub id: String,
    pub admin_id: String,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<String>,
    /// JSON-encoded details
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminAction> for AdminActionData {
    fn from(a: AdminAction) -> Self {
        Self {
            id: a.id.to_string(),
            admin_id: a.admin_id.to_string(),
            action: a.action,
            target_type: a.target_type,
            target_id: a.target_id.map(|id| id.to_string()),
            details: a.details.to_string(),
            created_at: a.created_at,
        }
    }
}
