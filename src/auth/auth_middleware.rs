// src/auth/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::errors::ErrorKind;
use tracing::{debug, error};
use uuid::Uuid;

use super::token::decode_token;
use crate::errors::AppError;
use crate::AppState;

/// Identity of the caller, taken from a valid `Authorization: Bearer <jwt>` header.
/// Add it as a handler argument to make a route require authentication.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        error!("AppState not registered; cannot validate bearer tokens");
        AppError::Internal("server misconfigured".to_string())
    })?;

    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Authentication token missing".to_string()))?;

    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authentication token".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid token format, expected 'Bearer <token>'".to_string())
        })?;

    let claims = decode_token(token, &state.config.jwt_secret).map_err(|e| {
        debug!(error = ?e, "Rejected bearer token");
        let message = match e.kind() {
            ErrorKind::ExpiredSignature => "Token expired",
            ErrorKind::InvalidSignature => "Invalid token signature",
            ErrorKind::InvalidToken => "Malformed token",
            _ => "Invalid authentication token",
        };
        AppError::Unauthorized(message.to_string())
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
    })
}
