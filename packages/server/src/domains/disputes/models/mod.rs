pub mod dispute;

pub use dispute::*;
