// src/shared/shared_structs.rs

use std::sync::PoisonError;

use serde::Serialize;

use crate::errors::AppError;

/// Generic envelope used by every API response: `{ success, message?, ...body }`.
/// `body` is flattened into the top level, so `T` must serialize as a map.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")] // Omit 'message' when None
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: Option<T>,
}

impl<T: Serialize> GenericResponse<T> {
    /// Successful response carrying a payload.
    pub fn ok(body: T) -> Self {
        Self {
            success: true,
            message: None,
            body: Some(body),
        }
    }
}

impl GenericResponse<()> {
    /// Successful response with no payload.
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            body: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            body: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            body: None,
        }
    }
}

/// Maps a poisoned session-store lock to an internal error.
pub fn lock_poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::Internal("session store lock poisoned".to_string())
}
