// src/addresses/address_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::address_structs::{Address, AddressPayload};
use crate::auth::auth_middleware::AuthenticatedUser;
use crate::errors::{AppError, Result};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

fn address_not_found() -> AppError {
    AppError::NotFound("Address not found".to_string())
}

/// Route adding an address. The newest address always becomes the default.
///
/// Clearing the previous default and inserting run in one transaction so a
/// user never ends up with two defaults or none.
#[post("/api/address")]
pub async fn add_address(
    data: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<AddressPayload>,
) -> Result<HttpResponse> {
    let new_address = body.into_inner().into_new_address()?;

    let mut transaction = data.db_pool.begin().await?;

    // Drop the current default
    sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
        .bind(auth.user_id)
        .execute(&mut *transaction)
        .await?;

    // Insert the new address as the default
    let address = sqlx::query_as::<_, Address>(
        "INSERT INTO addresses
            (id, user_id, address_type, full_name, phone, house, area, landmark, city, state, pincode, is_default)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.user_id)
    .bind(&new_address.address_type)
    .bind(&new_address.full_name)
    .bind(&new_address.phone)
    .bind(&new_address.house)
    .bind(&new_address.area)
    .bind(&new_address.landmark)
    .bind(&new_address.city)
    .bind(&new_address.state)
    .bind(&new_address.pincode)
    .fetch_one(&mut *transaction)
    .await?;

    transaction.commit().await?;
    info!(user_id = %auth.user_id, address_id = %address.id, "Address added");

    Ok(HttpResponse::Created().json(GenericResponse::ok(json!({ "address": address }))))
}

/// Route listing the user's addresses, default first then newest first.
#[get("/api/address")]
pub async fn get_addresses(data: web::Data<AppState>, auth: AuthenticatedUser) -> Result<HttpResponse> {
    let addresses = sqlx::query_as::<_, Address>(
        "SELECT * FROM addresses WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "addresses": addresses }))))
}

/// Route making one address the user's only default.
#[put("/api/address/select/{id}")]
pub async fn select_address(
    data: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();
    let mut transaction = data.db_pool.begin().await?;

    sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
        .bind(auth.user_id)
        .execute(&mut *transaction)
        .await?;

    let selected = sqlx::query_as::<_, Address>(
        "UPDATE addresses SET is_default = TRUE, updated_at = NOW()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(address_id)
    .bind(auth.user_id)
    .fetch_optional(&mut *transaction)
    .await?;

    // Not the caller's address: undo the reset above
    let Some(selected) = selected else {
        transaction.rollback().await?;
        return Err(address_not_found());
    };

    transaction.commit().await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "address": selected }))))
}

/// Route updating the given fields of an address; omitted fields are kept.
#[put("/api/address/{id}")]
pub async fn update_address(
    data: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<AddressPayload>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();
    let update = body.normalized();

    let address = sqlx::query_as::<_, Address>(
        "UPDATE addresses SET
            address_type = COALESCE($1, address_type),
            full_name = COALESCE($2, full_name),
            phone = COALESCE($3, phone),
            house = COALESCE($4, house),
            area = COALESCE($5, area),
            landmark = COALESCE($6, landmark),
            city = COALESCE($7, city),
            state = COALESCE($8, state),
            pincode = COALESCE($9, pincode),
            updated_at = NOW()
         WHERE id = $10 AND user_id = $11
         RETURNING *",
    )
    .bind(&update.address_type)
    .bind(&update.full_name)
    .bind(&update.phone)
    .bind(&update.house)
    .bind(&update.area)
    .bind(&update.landmark)
    .bind(&update.city)
    .bind(&update.state)
    .bind(&update.pincode)
    .bind(address_id)
    .bind(auth.user_id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(address_not_found)?;

    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "address": address }))))
}

/// Route deleting an address.
#[delete("/api/address/{id}")]
pub async fn delete_address(
    data: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let address_id = path.into_inner();
    let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
        .bind(address_id)
        .bind(auth.user_id)
        .execute(&data.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(address_not_found());
    }

    Ok(HttpResponse::Ok().json(GenericResponse::message("Address deleted successfully")))
}
