//! Profile domain actions
//!
//! Actions are self-contained: they run their own authorization checks and
//! return final models.

mod documents;
mod profile;

pub use documents::*;
pub use profile::*;
