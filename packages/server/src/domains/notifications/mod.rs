//! Notifications domain - in-app messages with optional SMS fan-out

pub mod actions;
pub mod data;
pub mod models;

pub use actions::{kinds, notify};
