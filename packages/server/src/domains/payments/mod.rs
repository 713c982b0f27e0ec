//! Payments domain - gateway orders, reconciliation and refunds

pub mod actions;
pub mod data;
pub mod models;

pub use models::{Payment, PaymentStatus};
