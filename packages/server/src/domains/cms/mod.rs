//! CMS domain - editable homepage sections

pub mod actions;
pub mod data;
pub mod models;

pub use models::HomepageSection;
