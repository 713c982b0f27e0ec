use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::common::AppError;
use crate::domains::catalog::models::{AvailabilitySlot, Service, ServiceChanges, ServiceFilter};

/// GraphQL has no decimal scalar: amounts travel as `Float` with two
/// decimals and are rounded back on the way in.
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or_default()
}

pub fn f64_to_decimal(value: f64) -> Result<Decimal, AppError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AppError::validation("Invalid amount"))
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Service")]
pub struct ServiceData {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub duration_minutes: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Service> for ServiceData {
    fn from(s: Service) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name,
            slug: s.slug,
            category: s.category,
            description: s.description,
            base_price: decimal_to_f64(s.base_price),
            duration_minutes: s.duration_minutes,
            image_url: s.image_url,
            is_active: s.is_active,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct ServiceFilterInput {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl TryFrom<ServiceFilterInput> for ServiceFilter {
    type Error = AppError;

    fn try_from(input: ServiceFilterInput) -> Result<Self, Self::Error> {
        Ok(Self {
            category: input.category.map(|c| c.trim().to_lowercase()),
            search: input.search,
            min_price: input.min_price.map(f64_to_decimal).transpose()?,
            max_price: input.max_price.map(f64_to_decimal).transpose()?,
            include_inactive: false,
        })
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateServiceInput {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub duration_minutes: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct UpdateServiceInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub image_url: Option<String>,
}

impl TryFrom<UpdateServiceInput> for ServiceChanges {
    type Error = AppError;

    fn try_from(input: UpdateServiceInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name: input.name,
            category: input.category,
            description: input.description,
            base_price: input.base_price.map(f64_to_decimal).transpose()?,
            duration_minutes: input.duration_minutes,
            image_url: input.image_url,
        })
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "AvailabilitySlot")]
pub struct SlotData {
    pub id: String,
    pub professional_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_booked: bool,
}

impl From<AvailabilitySlot> for SlotData {
    fn from(s: AvailabilitySlot) -> Self {
        Self {
            id: s.id.to_string(),
            professional_id: s.professional_id.to_string(),
            starts_at: s.starts_at,
            ends_at: s.ends_at,
            is_booked: s.is_booked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decimal_float_conversion() {
        assert_eq!(decimal_to_f64(Decimal::from_str("499.50").unwrap()), 499.5);
        assert_eq!(f64_to_decimal(499.5).unwrap(), Decimal::from_str("499.50").unwrap());
        assert_eq!(f64_to_decimal(0.1 + 0.2).unwrap(), Decimal::from_str("0.30").unwrap());
        assert!(f64_to_decimal(f64::NAN).is_err());
    }
}
