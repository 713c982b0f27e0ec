use crate::domains::profiles::models::Role;

/// Privileged operations in the marketplace.
///
/// Every capability currently maps to the admin role; the indirection keeps
/// call sites stable if a support/operator role is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, edit and (de)activate catalog services
    ManageServices,

    /// Hide/show and verify customer reviews
    ModerateReviews,

    /// Assign professionals and force booking transitions
    ManageBookings,

    /// Resolve or reject disputes
    ResolveDisputes,

    /// Issue refunds through the payment gateway
    IssueRefunds,

    /// Change roles, suspend accounts, verify professionals
    ManageProfiles,

    /// Approve or reject professional documents
    VerifyDocuments,

    /// Edit homepage sections
    ManageContent,

    /// Read the admin audit log and dashboard stats
    ViewAuditLog,
}

impl Capability {
    pub fn required_role(&self) -> Role {
        Role::Admin
    }
}
