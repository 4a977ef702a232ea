// src/auth/auth_router.rs

use actix_web::{post, web, HttpResponse};
use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::auth_structs::{AuthBody, OtpRecord, SendOtpRequest, VerifyOtpRequest};
use super::otp::{deliver_otp, generate_otp, hash_otp, is_expired, otp_matches};
use super::token::issue_token;
use crate::errors::{AppError, Result};
use crate::shared::shared_structs::GenericResponse;
use crate::users::user_structs::User;
use crate::AppState;

/// Trimmed phone number; 400 when blank.
fn require_phone(phone: &str) -> Result<&str> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(AppError::Validation("Phone required".to_string()));
    }
    Ok(phone)
}

/// Generates a fresh code for `phone`, replacing any pending one, and delivers it.
async fn store_otp(data: &AppState, phone: &str) -> Result<()> {
    let code = generate_otp();
    let otp_hash = hash_otp(&code, data.config.otp_hash_cost)?;

    let created_at: chrono::DateTime<Utc> = sqlx::query_scalar(
        "INSERT INTO otps (phone, otp_hash, created_at) VALUES ($1, $2, NOW())
         ON CONFLICT (phone) DO UPDATE SET otp_hash = EXCLUDED.otp_hash, created_at = NOW()
         RETURNING created_at",
    )
    .bind(phone)
    .bind(&otp_hash)
    .fetch_one(&data.db_pool)
    .await?;

    deliver_otp(phone, &code, created_at + Duration::seconds(data.config.otp_ttl_secs));
    Ok(())
}

/// Checks the pending code for `phone` and consumes it.
/// Missing, expired and wrong codes are all reported as "Invalid OTP".
///
/// Steps:
/// 1. Loads the pending record and checks age and hash.
/// 2. Deletes that exact record (same phone and hash). If another
///    verification consumed it first, or a new code replaced it meanwhile,
///    nothing is deleted and this attempt fails, so a code is used at most once.
async fn consume_otp(data: &AppState, phone: &str, entered: &str) -> Result<()> {
    let record = sqlx::query_as::<_, OtpRecord>("SELECT phone, otp_hash, created_at FROM otps WHERE phone = $1")
        .bind(phone)
        .fetch_optional(&data.db_pool)
        .await?;

    let invalid = || AppError::Validation("Invalid OTP".to_string());
    let record = record.ok_or_else(invalid)?;

    // 1. Age and hash
    let expires_at = record.created_at + Duration::seconds(data.config.otp_ttl_secs);
    if is_expired(expires_at, Utc::now()) || !otp_matches(entered, &record.otp_hash)? {
        return Err(invalid());
    }

    // 2. Consume exactly the record that was checked
    let deleted = sqlx::query("DELETE FROM otps WHERE phone = $1 AND otp_hash = $2")
        .bind(&record.phone)
        .bind(&record.otp_hash)
        .execute(&data.db_pool)
        .await?;

    if deleted.rows_affected() == 0 {
        debug!(%phone, "OTP already consumed or replaced");
        return Err(invalid());
    }
    Ok(())
}

/// Signs a session token for `user_id` and wraps it in the auth envelope.
fn auth_response(data: &AppState, user_id: Uuid, is_new_user: bool) -> Result<HttpResponse> {
    let token = issue_token(
        user_id,
        &data.config.jwt_secret,
        Duration::days(data.config.jwt_expiry_days),
    )?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(AuthBody { token, is_new_user })))
}

/// Route sending an OTP to any phone, registered or not.
#[post("/api/auth/send-otp")]
pub async fn send_otp(data: web::Data<AppState>, body: web::Json<SendOtpRequest>) -> Result<HttpResponse> {
    let phone = require_phone(&body.phone)?;
    store_otp(&data, phone).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::success()))
}

/// Route verifying an OTP: logs in an existing user or signs up a new one.
///
/// Steps:
/// 1. Consumes the code.
/// 2. Returns a token for the user with this phone if there is one.
/// 3. Otherwise creates the user and flags the response as a new user.
#[post("/api/auth/verify-otp")]
pub async fn verify_otp(data: web::Data<AppState>, body: web::Json<VerifyOtpRequest>) -> Result<HttpResponse> {
    let phone = require_phone(&body.phone)?;
    consume_otp(&data, phone, &body.otp).await?;

    // 2. Existing user
    if let Some(user) = User::find_by_phone(&data.db_pool, phone).await? {
        return auth_response(&data, user.id, false);
    }

    // 3. Sign up
    match User::create_with_phone(&data.db_pool, phone).await? {
        Some(user) => {
            info!(user_id = %user.id, "New user signed up");
            auth_response(&data, user.id, true)
        }
        // Created concurrently by another verification of the same phone
        None => {
            let user = User::find_by_phone(&data.db_pool, phone)
                .await?
                .ok_or_else(|| AppError::Internal(format!("user for {phone} vanished after insert")))?;
            auth_response(&data, user.id, false)
        }
    }
}

/// Route sending a signup OTP. Fails if the phone is already registered.
#[post("/api/auth/register/send-otp")]
pub async fn register_send_otp(
    data: web::Data<AppState>,
    body: web::Json<SendOtpRequest>,
) -> Result<HttpResponse> {
    let phone = require_phone(&body.phone)?;
    if User::find_by_phone(&data.db_pool, phone).await?.is_some() {
        return Err(AppError::Validation("Phone already registered".to_string()));
    }

    store_otp(&data, phone).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::success()))
}

/// Route verifying a signup OTP and creating the user.
#[post("/api/auth/register/verify-otp")]
pub async fn register_verify_otp(
    data: web::Data<AppState>,
    body: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    let phone = require_phone(&body.phone)?;
    consume_otp(&data, phone, &body.otp).await?;

    let user = User::create_with_phone(&data.db_pool, phone)
        .await?
        .ok_or_else(|| AppError::Validation("Phone already registered".to_string()))?;

    info!(user_id = %user.id, "New user registered");
    auth_response(&data, user.id, true)
}

/// Route sending a login OTP. Fails if no user has this phone.
#[post("/api/auth/login/send-otp")]
pub async fn login_send_otp(data: web::Data<AppState>, body: web::Json<SendOtpRequest>) -> Result<HttpResponse> {
    let phone = require_phone(&body.phone)?;
    if User::find_by_phone(&data.db_pool, phone).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    store_otp(&data, phone).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::success()))
}

/// Route verifying a login OTP. Never creates a user.
#[post("/api/auth/login/verify-otp")]
pub async fn login_verify_otp(
    data: web::Data<AppState>,
    body: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    let phone = require_phone(&body.phone)?;
    let user = User::find_by_phone(&data.db_pool, phone)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    consume_otp(&data, phone, &body.otp).await?;
    auth_response(&data, user.id, false)
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{db_state, seed_otp, seed_user, test_app, unique_phone};

    macro_rules! post_json {
        ($app:expr, $uri:expr, $body:expr) => {{
            let req = test::TestRequest::post().uri($uri).set_json($body).to_request();
            test::call_service(&$app, req).await
        }};
    }

    async fn pending_otps(state: &AppState, phone: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM otps WHERE phone = $1")
            .bind(phone)
            .fetch_one(&state.db_pool)
            .await
            .unwrap()
    }

    #[core::prelude::v1::test]
    fn phone_is_trimmed_and_required() {
        assert_eq!(require_phone("  9876543210 ").unwrap(), "9876543210");
        assert!(matches!(require_phone("   "), Err(AppError::Validation(_))));
    }

    #[actix_web::test]
    async fn verify_signs_up_then_logs_in_and_consumes_the_code() {
        let Some(state) = db_state().await else { return };
        let app = test_app!(state);
        let phone = unique_phone();
        seed_otp(&state, &phone, "123456", 0).await;

        let resp = post_json!(app, "/api/auth/verify-otp", json!({ "phone": phone, "otp": "654321" }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(pending_otps(&state, &phone).await, 1);

        let resp = post_json!(app, "/api/auth/verify-otp", json!({ "phone": phone, "otp": "123456" }));
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["isNewUser"], true);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(pending_otps(&state, &phone).await, 0);

        let resp = post_json!(app, "/api/auth/verify-otp", json!({ "phone": phone, "otp": "123456" }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        seed_otp(&state, &phone, "222333", 0).await;
        let resp = post_json!(app, "/api/auth/verify-otp", json!({ "phone": phone, "otp": "222333" }));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["isNewUser"], false);
    }

    #[actix_web::test]
    async fn expired_code_is_invalid() {
        let Some(state) = db_state().await else { return };
        let app = test_app!(state);
        let phone = unique_phone();
        seed_otp(&state, &phone, "123456", state.config.otp_ttl_secs + 60).await;

        let resp = post_json!(app, "/api/auth/verify-otp", json!({ "phone": phone, "otp": "123456" }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid OTP");
    }

    #[actix_web::test]
    async fn concurrent_verifications_use_the_code_once() {
        let Some(state) = db_state().await else { return };
        let app = test_app!(state);
        let phone = unique_phone();
        seed_user(&state, &phone).await;
        seed_otp(&state, &phone, "123456", 0).await;

        let body = json!({ "phone": phone, "otp": "123456" });
        let first = test::TestRequest::post().uri("/api/auth/verify-otp").set_json(&body).to_request();
        let second = test::TestRequest::post().uri("/api/auth/verify-otp").set_json(&body).to_request();
        let (first, second) = futures::join!(test::call_service(&app, first), test::call_service(&app, second));

        let mut statuses = [first.status(), second.status()];
        statuses.sort_by_key(|s| s.as_u16());
        assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
    }

    #[actix_web::test]
    async fn resent_code_is_not_consumed_by_the_old_one() {
        let Some(state) = db_state().await else { return };
        let phone = unique_phone();
        seed_otp(&state, &phone, "123456", 0).await;
        seed_otp(&state, &phone, "999888", 0).await;

        assert!(consume_otp(&state, &phone, "123456").await.is_err());
        assert_eq!(pending_otps(&state, &phone).await, 1);
        assert!(consume_otp(&state, &phone, "999888").await.is_ok());
    }

    #[actix_web::test]
    async fn register_and_login_check_whether_the_phone_exists() {
        let Some(state) = db_state().await else { return };
        let app = test_app!(state);
        let known = unique_phone();
        let unknown = unique_phone();
        seed_user(&state, &known).await;

        let resp = post_json!(app, "/api/auth/register/send-otp", json!({ "phone": known }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = post_json!(app, "/api/auth/login/send-otp", json!({ "phone": unknown }));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = post_json!(app, "/api/auth/login/verify-otp", json!({ "phone": unknown, "otp": "123456" }));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = post_json!(app, "/api/auth/register/send-otp", json!({ "phone": unknown }));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(pending_otps(&state, &unknown).await, 1);

        // The delivered code is only logged, so replace it with a known one
        seed_otp(&state, &unknown, "123456", 0).await;
        let resp = post_json!(app, "/api/auth/register/verify-otp", json!({ "phone": unknown, "otp": "123456" }));
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["isNewUser"], true);

        let resp = post_json!(app, "/api/auth/login/send-otp", json!({ "phone": unknown }));
        assert_eq!(resp.status(), StatusCode::OK);
        seed_otp(&state, &unknown, "456789", 0).await;
        let resp = post_json!(app, "/api/auth/login/verify-otp", json!({ "phone": unknown, "otp": "456789" }));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["isNewUser"], false);
    }
}
