use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use crate::domains::notifications::models::Notification;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Notification")]
pub struct NotificationData {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationData {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind,
            title: n.title,
            body: n.body,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}
