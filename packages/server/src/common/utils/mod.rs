pub mod phone;
pub mod retry;
pub mod slug;

pub use phone::*;
pub use retry::*;
pub use slug::*;
