// src/orders/mod.rs

// Order history route
pub mod order_router;
// Order row and checkout request body
pub mod order_structs;
