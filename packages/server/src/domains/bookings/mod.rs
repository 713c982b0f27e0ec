//! Bookings domain - the lifecycle from reservation to completion

pub mod actions;
pub mod data;
pub mod models;

pub use models::{Booking, BookingStatus};
