use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::common::{AppError, AppResult, ProfileId, ServiceId, SlotId};
use crate::domains::bookings::actions::BookingRequest;
use crate::domains::bookings::models::{Booking, BookingStatus};
use crate::domains::catalog::data::decimal_to_f64;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Booking")]
pub struct BookingData {
    pub id: String,
    pub customer_id: String,
    pub professional_id: Option<String>,
    pub service_id: String,
    pub slot_id: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub address: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub total_amount: f64,
    pub currency: String,
    pub cancellation_reason: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingData {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id.to_string(),
            customer_id: b.customer_id.to_string(),
            professional_id: b.professional_id.map(|id| id.to_string()),
            service_id: b.service_id.to_string(),
            slot_id: b.slot_id.map(|id| id.to_string()),
            scheduled_at: b.scheduled_at,
            address: b.address,
            notes: b.notes,
            status: b.status,
            total_amount: decimal_to_f64(b.total_amount),
            currency: b.currency,
            cancellation_reason: b.cancellation_reason,
            confirmed_at: b.confirmed_at,
            started_at: b.started_at,
            completed_at: b.completed_at,
            cancelled_at: b.cancelled_at,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateBookingInput {
    pub service_id: String,
    pub professional_id: Option<String>,
    pub slot_id: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub address: String,
    pub notes: Option<String>,
}

impl TryFrom<CreateBookingInput> for BookingRequest {
    type Error = AppError;

    fn try_from(input: CreateBookingInput) -> AppResult<Self> {
        let invalid = |field: &str| AppError::validation(format!("Invalid {}", field));
        Ok(Self {
            service_id: ServiceId::parse(&input.service_id).map_err(|_| invalid("service id"))?,
            professional_id: input
                .professional_id
                .as_deref()
                .map(ProfileId::parse)
                .transpose()
                .map_err(|_| invalid("professional id"))?,
            slot_id: input
                .slot_id
                .as_deref()
                .map(SlotId::parse)
                .transpose()
                .map_err(|_| invalid("slot id"))?,
            scheduled_at: input.scheduled_at,
            address: input.address,
            notes: input.notes,
        })
    }
}

/// Bookings per status for the admin dashboard.
#[derive(Debug, Clone, GraphQLObject)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateBookingInput {
        CreateBookingInput {
            service_id: ServiceId::new().to_string(),
            professional_id: None,
            slot_id: None,
            scheduled_at: None,
            address: "12 MG Road".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_input_parses_ids() {
        let slot = SlotId::new();
        let request = BookingRequest::try_from(CreateBookingInput {
            slot_id: Some(slot.to_string()),
            ..input()
        })
        .unwrap();
        assert_eq!(request.slot_id, Some(slot));
        assert!(request.professional_id.is_none());
    }

    #[test]
    fn test_input_rejects_bad_ids() {
        let err = BookingRequest::try_from(CreateBookingInput {
            professional_id: Some("nope".to_string()),
            ..input()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid professional id");
    }
}
