// HomeFix marketplace - API core
//
// Customers book home services from verified professionals, pay through the
// payment gateway, and review completed work. Admins moderate everything.
//
// Each business domain lives in domains/<name>/ with models (SQL), actions
// (business rules) and data (GraphQL types).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
