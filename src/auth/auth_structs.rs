// src/auth/auth_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Body of every "send OTP" request.
#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone: String,
}

/// Body of every "verify OTP" request.
#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub otp: String,
}

/// JWT payload. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64, // Issued at (Unix timestamp)
    pub exp: i64, // Expiration time (Unix timestamp)
}

/// Payload returned once an OTP has been verified.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthBody {
    pub token: String,
    pub is_new_user: bool,
}

/// Pending login/signup code for a phone. At most one per phone.
#[derive(Debug, FromRow)]
pub struct OtpRecord {
    pub phone: String,
    pub otp_hash: String,
    pub created_at: DateTime<Utc>,
}
