//! Auth domain actions - business logic functions
//!
//! Called directly from the REST login handlers.

mod resolve_role;
mod send_otp;
mod verify_otp;

pub use resolve_role::resolve_role;
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;
