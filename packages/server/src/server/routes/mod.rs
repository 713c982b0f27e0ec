// HTTP routes
pub mod auth;
pub mod dashboard;
pub mod graphql;
pub mod health;
pub mod payments;

pub use auth::*;
pub use dashboard::*;
pub use graphql::*;
pub use health::*;
pub use payments::*;
