// Business domains
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod cms;
pub mod disputes;
pub mod notifications;
pub mod payments;
pub mod profiles;
pub mod reviews;
