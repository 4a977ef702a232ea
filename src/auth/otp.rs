// src/auth/otp.rs

//! One-time codes: generation, hashing at rest, and checks.
//!
//! Codes are never stored in clear; only their bcrypt hash is persisted.
//! Delivery is a log line until an SMS provider is wired in.

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use tracing::{debug, info, instrument};

use crate::errors::AppError;

const OTP_MIN: u32 = 100_000;
const OTP_SPAN: u32 = 900_000;

/// Six-digit code in `100000..=999999`.
pub fn generate_otp() -> String {
    (OTP_MIN + OsRng.next_u32() % OTP_SPAN).to_string()
}

#[instrument(name = "otp::hash_otp", skip(code), err(Display))]
pub fn hash_otp(code: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(code, cost)?)
}

/// Compares a user-entered code (whitespace trimmed) with a stored hash.
#[instrument(name = "otp::otp_matches", skip_all, err(Display))]
pub fn otp_matches(entered: &str, stored_hash: &str) -> Result<bool, AppError> {
    let entered = entered.trim();
    if entered.is_empty() {
        debug!("Empty OTP submitted");
        return Ok(false);
    }
    Ok(verify(entered, stored_hash)?)
}

pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}

/// Stand-in for SMS delivery.
pub fn deliver_otp(phone: &str, code: &str, expires_at: DateTime<Utc>) {
    info!(%phone, otp = %code, %expires_at, "OTP generated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const TEST_COST: u32 = 4;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn hashed_code_matches_only_itself() {
        let stored = hash_otp("482913", TEST_COST).unwrap();

        assert_ne!(stored, "482913");
        assert!(otp_matches("482913", &stored).unwrap());
        assert!(otp_matches(" 482913 ", &stored).unwrap());
        assert!(!otp_matches("482914", &stored).unwrap());
        assert!(!otp_matches("", &stored).unwrap());
    }

    #[test]
    fn expiry_is_strictly_after_deadline() {
        let now = Utc::now();
        assert!(!is_expired(now + Duration::seconds(1), now));
        assert!(!is_expired(now, now));
        assert!(is_expired(now - Duration::seconds(1), now));
    }
}
