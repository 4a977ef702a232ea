// src/cart/mod.rs

// Multi-category cart and its per-user store
pub mod cart_structs;
// Single-slot hotel booking cart
pub mod hotel_structs;
// HTTP routes for the carts and checkout
pub mod cart_router;
