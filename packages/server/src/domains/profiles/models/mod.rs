pub mod professional_document;
pub mod profile;

pub use professional_document::{DocumentStatus, ProfessionalDocument};
pub use profile::{Profile, ProfileChanges, Role};
