// HTTP middleware
pub mod ip_extractor;
pub mod jwt_auth;
pub mod role_guard;

pub use ip_extractor::*;
pub use jwt_auth::*;
pub use role_guard::*;
