// src/users/user_structs.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;

/// A user row. Users are identified by phone; the profile is filled in later.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub email: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub profile_completed: bool,
    #[serde(skip_serializing)] // bcrypt hash of the pending profile-update OTP
    pub update_otp: Option<String>,
    #[serde(skip_serializing)]
    pub update_otp_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Creates a user that only has a phone number.
    /// Returns `None` when the phone is already registered.
    pub async fn create_with_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, phone) VALUES ($1, $2) ON CONFLICT (phone) DO NOTHING RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(phone)
        .fetch_optional(pool)
        .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(AppError::Validation(format!(
                "Invalid gender '{other}', expected 'Male' or 'Female'"
            ))),
        }
    }
}

/// Parses a date of birth in `dd/mm/yyyy`.
pub fn parse_dob(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map_err(|_| AppError::Validation(format!("Invalid date of birth '{raw}', expected dd/mm/yyyy")))
}

/// Profile fields as submitted by the client.
#[derive(Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub dob: String,
}

/// Profile fields after validation.
#[derive(Debug, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub dob: NaiveDate,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<ProfileUpdate, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        Ok(ProfileUpdate {
            name: name.to_string(),
            email: self.email.trim().to_string(),
            gender: self.gender.parse()?,
            dob: parse_dob(&self.dob)?,
        })
    }
}

/// Body of `verify-update-otp`: the code plus the new profile.
#[derive(Deserialize)]
pub struct VerifyUpdateOtpRequest {
    #[serde(default)]
    pub otp: String,
    #[serde(flatten)]
    pub profile: ProfileRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(gender: &str, dob: &str) -> ProfileRequest {
        ProfileRequest {
            name: " Asha ".to_string(),
            email: "asha@example.com".to_string(),
            gender: gender.to_string(),
            dob: dob.to_string(),
        }
    }

    #[test]
    fn parses_day_first_dates() {
        assert_eq!(parse_dob("15/08/1995").unwrap(), NaiveDate::from_ymd_opt(1995, 8, 15).unwrap());
    }

    #[test]
    fn rejects_other_date_shapes() {
        assert!(parse_dob("1995-08-15").is_err());
        assert!(parse_dob("31/02/2000").is_err());
        assert!(parse_dob("").is_err());
    }

    #[test]
    fn valid_profile_is_normalised() {
        let update = request("Female", "01/01/2000").validate().unwrap();
        assert_eq!(update.name, "Asha");
        assert_eq!(update.gender, Gender::Female);
    }

    #[test]
    fn unknown_gender_is_validation_error() {
        assert!(matches!(
            request("other", "01/01/2000").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn update_request_reads_flattened_profile() {
        let body: VerifyUpdateOtpRequest = serde_json::from_value(serde_json::json!({
            "otp": "123456",
            "name": "Ravi",
            "email": "ravi@example.com",
            "gender": "Male",
            "dob": "02/03/1990"
        }))
        .unwrap();
        assert_eq!(body.otp, "123456");
        assert_eq!(body.profile.validate().unwrap().gender, Gender::Male);
    }
}
