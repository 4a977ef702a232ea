// src/orders/order_router.rs

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use super::order_structs::Order;
use crate::auth::auth_middleware::AuthenticatedUser;
use crate::errors::Result;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Route listing the user's orders, newest first.
#[get("/api/orders")]
pub async fn get_orders(data: web::Data<AppState>, auth: AuthenticatedUser) -> Result<HttpResponse> {
    let orders = Order::list_for_user(&data.db_pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "orders": orders }))))
}
