//! Catalog domain - services, who offers them, and when

pub mod actions;
pub mod data;
pub mod models;

pub use models::{AvailabilitySlot, Service};
