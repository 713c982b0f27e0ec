// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod id;
pub mod money;
pub mod pagination;
pub mod utils;

pub use auth::{Actor, AuthError, Capability, HasAuthContext};
pub use entity_ids::*;
pub use error::{AppError, AppResult};
pub use id::Id;
pub use pagination::PageArgs;
