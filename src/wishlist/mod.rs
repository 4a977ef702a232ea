// src/wishlist/mod.rs

// Wishlist routes
pub mod wishlist_router;
// Liked items and the per-user store
pub mod wishlist_structs;
