pub mod homepage_section;

pub use homepage_section::*;
