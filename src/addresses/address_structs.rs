// src/addresses/address_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;

/// A delivery address stored in a user's address book.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_type: String,
    pub full_name: String,
    pub phone: String,
    pub house: String,
    pub area: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Picks the delivery address for a checkout: the requested one if it
    /// belongs to the user, otherwise the user's default.
    pub async fn resolve_for_checkout(
        pool: &PgPool,
        user_id: Uuid,
        requested: Option<Uuid>,
    ) -> Result<Uuid, AppError> {
        match requested {
            Some(address_id) => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM addresses WHERE id = $1 AND user_id = $2",
            )
            .bind(address_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Address not found".to_string())),
            None => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM addresses WHERE user_id = $1 AND is_default
                 ORDER BY created_at DESC LIMIT 1",
            )
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::Validation("No delivery address selected".to_string())),
        }
    }
}

/// Address fields as sent by the client. Used whole for creation and
/// partially for updates, so every field is optional here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressPayload {
    pub address_type: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub house: Option<String>,
    pub area: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// Validated address ready to be inserted.
#[derive(Debug, PartialEq)]
pub struct NewAddress {
    pub address_type: String,
    pub full_name: String,
    pub phone: String,
    pub house: String,
    pub area: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl AddressPayload {
    /// Requires every field except `landmark` and upper-cases the address type.
    pub fn into_new_address(self) -> Result<NewAddress, AppError> {
        let required = |value: &Option<String>| {
            trimmed(value)
                .ok_or_else(|| AppError::Validation("All required fields must be filled".to_string()))
        };

        Ok(NewAddress {
            address_type: required(&self.address_type)?.to_uppercase(),
            full_name: required(&self.full_name)?,
            phone: required(&self.phone)?,
            house: required(&self.house)?,
            area: required(&self.area)?,
            landmark: trimmed(&self.landmark),
            city: required(&self.city)?,
            state: required(&self.state)?,
            pincode: required(&self.pincode)?,
        })
    }

    /// Normalises a partial update: blank fields are treated as absent and the
    /// address type is upper-cased.
    pub fn normalized(&self) -> AddressPayload {
        AddressPayload {
            address_type: trimmed(&self.address_type).map(|t| t.to_uppercase()),
            full_name: trimmed(&self.full_name),
            phone: trimmed(&self.phone),
            house: trimmed(&self.house),
            area: trimmed(&self.area),
            landmark: trimmed(&self.landmark),
            city: trimmed(&self.city),
            state: trimmed(&self.state),
            pincode: trimmed(&self.pincode),
        }
    }
}
