// src/wishlist/wishlist_router.rs

use std::sync::RwLock;

use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use super::wishlist_structs::{WishlistItem, WishlistStore};
use crate::auth::auth_middleware::AuthenticatedUser;
use crate::errors::Result;
use crate::shared::shared_structs::{lock_poisoned, GenericResponse};

/// Route listing the caller's liked items.
#[get("/api/wishlist")]
pub async fn get_wishlist(
    wishlists: web::Data<RwLock<WishlistStore>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse> {
    let store = wishlists.read().map_err(lock_poisoned)?;
    let items = store.get(&auth.user_id).map(|w| w.items()).unwrap_or_default();
    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({ "wishlist": items }))))
}

/// Route liking an item, or unliking it if it was already liked.
#[post("/api/wishlist/toggle")]
pub async fn toggle_like(
    wishlists: web::Data<RwLock<WishlistStore>>,
    auth: AuthenticatedUser,
    item: web::Json<WishlistItem>,
) -> Result<HttpResponse> {
    let mut store = wishlists.write().map_err(lock_poisoned)?;
    let wishlist = store.entry(auth.user_id);
    let liked = wishlist.toggle_like(item.into_inner());

    Ok(HttpResponse::Ok().json(GenericResponse::ok(json!({
        "liked": liked,
        "wishlist": wishlist.items(),
    }))))
}
