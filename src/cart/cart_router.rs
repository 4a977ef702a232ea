// src/cart/cart_router.rs

use std::sync::RwLock;

use actix_web::{delete, get, post, web, HttpResponse};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::cart_structs::{lines_total, Cart, CartCategory, CartError, CartItem, CartStore, NewCartItem};
use super::hotel_structs::{HotelBooking, HotelCart};
use crate::addresses::address_structs::Address;
use crate::auth::auth_middleware::AuthenticatedUser;
use crate::errors::{AppError, Result};
use crate::orders::order_structs::{CheckoutRequest, Order};
use crate::shared::shared_structs::{lock_poisoned, GenericResponse};
use crate::AppState;

/// Answers with one category of `cart`: its lines, total and badge count.
fn summary_response(cart: &Cart, category: CartCategory) -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::ok(cart.category_summary(category)))
}

/// Runs one mutation on the caller's cart under the write lock and answers
/// with the updated category.
fn mutate_cart<F>(
    carts: &RwLock<CartStore>,
    auth: &AuthenticatedUser,
    category: CartCategory,
    op: F,
) -> Result<HttpResponse>
where
    F: FnOnce(&mut Cart) -> Result<(), CartError>,
{
    let mut store = carts.write().map_err(lock_poisoned)?;
    let cart = &mut store.entry(auth.user_id).cart;
    op(cart)?;
    Ok(summary_response(cart, category))
}

/// Route returning every category of the caller's cart with totals and counts.
#[get("/api/cart")]
pub async fn get_cart(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse> {
    let store = carts.read().map_err(lock_poisoned)?;
    // A user who never touched the cart sees four empty categories
    let summary = match store.get(&auth.user_id) {
        Some(user) => user.cart.summary(),
        None => Cart::default().summary(),
    };
    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "categories": summary }))))
}

/// Route returning one category: items, total and badge count.
#[get("/api/cart/{category}")]
pub async fn get_category(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let category: CartCategory = path.parse()?;
    let store = carts.read().map_err(lock_poisoned)?;
    Ok(match store.get(&auth.user_id) {
        Some(user) => summary_response(&user.cart, category),
        None => summary_response(&Cart::default(), category),
    })
}

/// Route adding an item to the category named in the item itself.
/// Adding an id already in the cart bumps its quantity by one.
#[post("/api/cart/items")]
pub async fn add_item(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    item: web::Json<NewCartItem>,
) -> Result<HttpResponse> {
    // The category travels in the item body, not the path
    let item = item.into_inner();
    let category = item.category.parse::<CartCategory>();

    let mut store = carts.write().map_err(lock_poisoned)?;
    let cart = &mut store.entry(auth.user_id).cart;
    // add_item logs and rejects an invalid category itself
    cart.add_item(item)?;
    Ok(summary_response(cart, category?))
}

/// Route incrementing the quantity of a line by one.
///
/// 404 when the id is not in that category, 400 for an unknown category.
#[post("/api/cart/{category}/items/{id}/increase")]
pub async fn increase_quantity(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (category, id) = path.into_inner();
    let category: CartCategory = category.parse()?;
    mutate_cart(&carts, &auth, category, |cart| cart.increase_quantity(&id, category))
}

/// Route decrementing a quantity; the line disappears when it reaches zero.
#[post("/api/cart/{category}/items/{id}/decrease")]
pub async fn decrease_quantity(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (category, id) = path.into_inner();
    let category: CartCategory = category.parse()?;
    mutate_cart(&carts, &auth, category, |cart| cart.decrease_quantity(&id, category))
}

/// Route removing a line whatever its quantity.
#[delete("/api/cart/{category}/items/{id}")]
pub async fn remove_item(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (category, id) = path.into_inner();
    let category: CartCategory = category.parse()?;
    mutate_cart(&carts, &auth, category, |cart| cart.remove_item(&id, category))
}

/// Route emptying every category of the caller's cart.
#[delete("/api/cart")]
pub async fn clear_cart(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse> {
    let mut store = carts.write().map_err(lock_poisoned)?;
    store.entry(auth.user_id).cart.clear(None);
    Ok(HttpResponse::Ok().json(GenericResponse::message("Cart cleared")))
}

/// Route emptying one category.
#[delete("/api/cart/{category}")]
pub async fn clear_category(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let category: CartCategory = path.parse()?;
    mutate_cart(&carts, &auth, category, |cart| {
        cart.clear(Some(category));
        Ok(())
    })
}

/// Resolves the delivery address and persists the order for `lines`.
async fn place_order(
    data: &AppState,
    user_id: Uuid,
    category: CartCategory,
    lines: &[CartItem],
    requested_address: Option<Uuid>,
) -> Result<Order> {
    let address_id = Address::resolve_for_checkout(&data.db_pool, user_id, requested_address).await?;
    let total = lines_total(lines);
    Ok(Order::create(&data.db_pool, user_id, category, lines, &total, address_id).await?)
}

/// Route placing an order for one cart category.
///
/// Steps:
/// 1. Takes the category's lines out of the cart under the write lock, so a
///    concurrent checkout of the same category finds it empty.
/// 2. Resolves the delivery address: the one in the body, else the default.
/// 3. Persists the order in status `pending`.
/// 4. On any failure the taken lines go back into the cart; other categories
///    are never touched.
#[post("/api/cart/{category}/checkout")]
pub async fn checkout(
    data: web::Data<AppState>,
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
    body: Option<web::Json<CheckoutRequest>>,
) -> Result<HttpResponse> {
    let category: CartCategory = path.parse()?;

    // 1. Take the lines; the lock is released before any await
    let lines = {
        let mut store = carts.write().map_err(lock_poisoned)?;
        let cart = &mut store.entry(auth.user_id).cart;
        if cart.items(category).is_empty() {
            return Err(AppError::Validation(format!(
                "Your {category} cart is empty. Add items before checking out."
            )));
        }
        cart.take_category(category)
    };

    // 2-3. Address and insert
    let requested_address = body.and_then(|b| b.address_id);
    match place_order(&data, auth.user_id, category, &lines, requested_address).await {
        Ok(order) => {
            info!(user_id = %auth.user_id, order_id = %order.id, %category, total = %order.total_amount, "Order placed");
            Ok(HttpResponse::Created().json(GenericResponse::ok(json!({ "order": order }))))
        }
        // 4. Give the lines back
        Err(e) => {
            warn!(user_id = %auth.user_id, %category, error = %e, "Checkout failed, restoring cart lines");
            let mut store = carts.write().map_err(lock_poisoned)?;
            store.entry(auth.user_id).cart.restore_category(category, lines);
            Err(e)
        }
    }
}

/// Answers with the held booking (or `null`) and its price × nights total.
fn hotel_response(hotel: &HotelCart) -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::ok(json!({
        "booking": hotel.booking(),
        "total": hotel.total(),
    })))
}

/// Route returning the caller's hotel booking, if any.
#[get("/api/hotel-cart")]
pub async fn get_hotel_cart(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse> {
    let store = carts.read().map_err(lock_poisoned)?;
    Ok(match store.get(&auth.user_id) {
        Some(user) => hotel_response(&user.hotel),
        None => hotel_response(&HotelCart::default()),
    })
}

/// Route holding a hotel booking, replacing any previous one.
#[post("/api/hotel-cart")]
pub async fn add_hotel(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
    booking: web::Json<HotelBooking>,
) -> Result<HttpResponse> {
    let mut store = carts.write().map_err(lock_poisoned)?;
    let hotel = &mut store.entry(auth.user_id).hotel;
    hotel.add_hotel(booking.into_inner());
    Ok(hotel_response(hotel))
}

/// Route dropping the held hotel booking.
#[delete("/api/hotel-cart")]
pub async fn clear_hotel_cart(
    carts: web::Data<RwLock<CartStore>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse> {
    let mut store = carts.write().map_err(lock_poisoned)?;
    store.entry(auth.user_id).hotel.clear();
    Ok(HttpResponse::Ok().json(GenericResponse::message("Hotel cart cleared")))
}
