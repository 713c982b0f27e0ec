pub mod availability_slot;
pub mod professional_service;
pub mod service;

pub use availability_slot::AvailabilitySlot;
pub use professional_service::ProfessionalService;
pub use service::{NewService, Service, ServiceChanges, ServiceFilter};
