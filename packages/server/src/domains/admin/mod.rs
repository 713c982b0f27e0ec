//! Admin domain - audit log and dashboard stats

pub mod actions;
pub mod data;
pub mod models;

pub use models::AdminAction;
