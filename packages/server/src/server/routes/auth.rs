//! Phone OTP login endpoints

use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::info;

use crate::common::utils::mask_phone;
use crate::common::AppResult;
use crate::domains::auth::actions::{send_otp, verify_otp};
use crate::domains::auth::types::{OtpSent, SendOtpRequest, Session, VerifyOtpRequest};
use crate::kernel::ServerDeps;
use crate::server::middleware::ClientIp;

/// POST /api/auth/otp/send
pub async fn send_otp_handler(
    State(deps): State<Arc<ServerDeps>>,
    client_ip: Option<Extension<ClientIp>>,
    Json(request): Json<SendOtpRequest>,
) -> AppResult<Json<OtpSent>> {
    if let Some(Extension(ClientIp(ip))) = client_ip {
        info!(phone = %mask_phone(&request.phone), ip = %ip, "OTP requested");
    }
    let sent = send_otp(&request.phone, &deps).await?;
    Ok(Json(sent))
}

/// POST /api/auth/otp/verify
pub async fn verify_otp_handler(
    State(deps): State<Arc<ServerDeps>>,
    Json(request): Json<VerifyOtpRequest>,
) -> AppResult<Json<Session>> {
    let session = verify_otp(&request.phone, &request.code, request.role, &deps).await?;
    Ok(Json(session))
}
