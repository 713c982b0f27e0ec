//! Profiles domain - users, roles and professional verification documents

pub mod actions;
pub mod data;
pub mod models;

pub use models::{Profile, Role};
