//! Typed ids for every persisted entity.

pub use super::id::Id;

pub struct Profile;
pub struct Service;
pub struct AvailabilitySlot;
pub struct Booking;
pub struct Payment;
pub struct Review;
pub struct Dispute;
pub struct AdminAction;
pub struct ProfessionalDocument;
pub struct HomepageSection;
pub struct Notification;
pub struct OtpCode;

pub type ProfileId = Id<Profile>;
pub type ServiceId = Id<Service>;
pub type SlotId = Id<AvailabilitySlot>;
pub type BookingId = Id<Booking>;
pub type PaymentId = Id<Payment>;
pub type ReviewId = Id<Review>;
pub type DisputeId = Id<Dispute>;
pub type AdminActionId = Id<AdminAction>;
pub type DocumentId = Id<ProfessionalDocument>;
pub type SectionId = Id<HomepageSection>;
pub type NotificationId = Id<Notification>;
pub type OtpCodeId = Id<OtpCode>;
