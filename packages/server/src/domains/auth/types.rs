//! Auth domain request/response types for the REST login endpoints.

use serde::{Deserialize, Serialize};

use crate::common::ProfileId;
use crate::domains::profiles::models::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpSent {
    pub phone_number: String,
    pub expires_in_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
    /// Role requested at sign-up. Ignored for existing profiles.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Issued session plus where the client should land.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub profile_id: ProfileId,
    pub role: Role,
    pub redirect_to: String,
    pub is_new_profile: bool,
}
