pub mod lifecycle;
pub mod queries;

pub use lifecycle::*;
pub use queries::*;
