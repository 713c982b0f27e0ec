//! Catalog actions: services, offerings and availability

mod offerings;
mod services;
mod slots;

pub use offerings::*;
pub use services::*;
pub use slots::*;
