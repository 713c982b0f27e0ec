pub mod checkout;
mod orders;
pub mod refunds;
pub mod settle;
pub mod verify;
pub mod webhook;

pub use checkout::{booking_payment, create_order, CheckoutOrder};
pub use refunds::{mark_booking_refunded, refund_booking};
pub use settle::Settlement;
pub use verify::{verify_payment, PaymentConfirmation};
pub use webhook::{handle_webhook, WebhookOutcome};
