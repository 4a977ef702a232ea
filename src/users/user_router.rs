// src/users/user_router.rs

use actix_web::{get, post, web, HttpResponse};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::info;

use super::user_structs::{ProfileRequest, ProfileUpdate, User, VerifyUpdateOtpRequest};
use crate::auth::auth_middleware::AuthenticatedUser;
use crate::auth::otp::{deliver_otp, generate_otp, hash_otp, is_expired, otp_matches};
use crate::errors::{AppError, Result};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Current user row; 404 when the account no longer exists.
async fn load_user(data: &AppState, auth: &AuthenticatedUser) -> Result<User> {
    User::find_by_id(&data.db_pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Writes the profile, marks it completed and drops any pending update code.
async fn save_profile(data: &AppState, auth: &AuthenticatedUser, profile: &ProfileUpdate) -> Result<()> {
    sqlx::query(
        "UPDATE users
         SET name = $1, email = $2, gender = $3, dob = $4, profile_completed = TRUE,
             update_otp = NULL, update_otp_expires = NULL, updated_at = NOW()
         WHERE id = $5",
    )
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(profile.gender.as_str())
    .bind(profile.dob)
    .bind(auth.user_id)
    .execute(&data.db_pool)
    .await?;
    Ok(())
}

/// Route returning the logged-in user's profile.
#[get("/api/user/me")]
pub async fn get_me(data: web::Data<AppState>, auth: AuthenticatedUser) -> Result<HttpResponse> {
    let user = load_user(&data, &auth).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "user": user }))))
}

/// Route used right after signup to fill in the profile of a new user.
#[post("/api/user/complete-profile")]
pub async fn complete_profile(
    data: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<ProfileRequest>,
) -> Result<HttpResponse> {
    let profile = body.validate()?;
    load_user(&data, &auth).await?;

    save_profile(&data, &auth, &profile).await?;
    info!(user_id = %auth.user_id, "Profile completed");

    Ok(HttpResponse::Ok().json(GenericResponse::success()))
}

/// Route issuing the OTP that guards profile edits.
#[post("/api/user/send-update-otp")]
pub async fn send_update_otp(data: web::Data<AppState>, auth: AuthenticatedUser) -> Result<HttpResponse> {
    let user = load_user(&data, &auth).await?;

    // A new code replaces any pending one
    let code = generate_otp();
    let expires_at = Utc::now() + Duration::seconds(data.config.otp_ttl_secs);
    let otp_hash = hash_otp(&code, data.config.otp_hash_cost)?;

    sqlx::query("UPDATE users SET update_otp = $1, update_otp_expires = $2, updated_at = NOW() WHERE id = $3")
        .bind(&otp_hash)
        .bind(expires_at)
        .bind(user.id)
        .execute(&data.db_pool)
        .await?;

    deliver_otp(&user.phone, &code, expires_at);
    Ok(HttpResponse::Ok().json(GenericResponse::success()))
}

/// Route that checks the profile-update OTP and applies the new profile.
///
/// The code is checked before its expiry, so a wrong code is always reported
/// as invalid even after the deadline. A successful update clears the code.
///
/// Steps:
/// 1. Validates the submitted profile.
/// 2. Requires a pending code, then checks it, then its expiry.
/// 3. Saves the profile.
#[post("/api/user/verify-update-otp")]
pub async fn verify_update_otp(
    data: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<VerifyUpdateOtpRequest>,
) -> Result<HttpResponse> {
    let profile = body.profile.validate()?;
    let user = load_user(&data, &auth).await?;

    // 2. Pending code
    let (stored_hash, expires_at) = match (&user.update_otp, user.update_otp_expires) {
        (Some(hash), Some(expires_at)) => (hash, expires_at),
        _ => return Err(AppError::Validation("OTP not generated".to_string())),
    };

    if !otp_matches(&body.otp, stored_hash)? {
        return Err(AppError::Validation("Invalid OTP".to_string()));
    }
    if is_expired(expires_at, Utc::now()) {
        return Err(AppError::Validation("OTP expired".to_string()));
    }

    // 3. Save
    save_profile(&data, &auth, &profile).await?;
    info!(user_id = %auth.user_id, "Profile updated after OTP check");

    Ok(HttpResponse::Ok().json(GenericResponse::success()))
}
