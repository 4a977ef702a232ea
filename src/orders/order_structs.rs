// src/orders/order_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::cart::cart_structs::{CartCategory, CartItem};

pub const STATUS_PENDING: &str = "pending";

/// An order placed from one cart category. `items` is a snapshot of the
/// cart lines at checkout time.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub items: Json<Vec<CartItem>>,
    pub total_amount: BigDecimal,
    pub status: String,
    pub address_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Inserts a `pending` order for the given lines.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        category: CartCategory,
        items: &[CartItem],
        total_amount: &BigDecimal,
        address_id: Uuid,
    ) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, user_id, category, items, total_amount, status, address_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(category.as_str())
        .bind(Json(items))
        .bind(total_amount)
        .bind(STATUS_PENDING)
        .bind(address_id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}

/// Optional checkout body. Without an address id the default address is used.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub address_id: Option<Uuid>,
}
