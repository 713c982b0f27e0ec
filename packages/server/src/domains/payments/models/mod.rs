pub mod payment;
pub mod payment_order;
pub mod webhook_event;

pub use payment::*;
pub use payment_order::*;
pub use webhook_event::*;
