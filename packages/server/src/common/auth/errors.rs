use thiserror::Error;

use crate::domains::profiles::models::Role;

/// Authorization errors raised by role and capability checks
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{} access required", .0.label())]
    RoleRequired(Role),

    #[error("Account is suspended")]
    Suspended,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
