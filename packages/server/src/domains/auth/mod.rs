//! Auth domain - phone OTP login and session tokens
//!
//! Responsibilities:
//! - Issuing and checking one-time codes (delivered over SMS)
//! - Creating the profile on first sign-in
//! - Session/JWT token management

pub mod actions;
pub mod jwt;
pub mod models;
pub mod types;

pub use jwt::{Claims, JwtService};
