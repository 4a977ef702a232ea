// src/users/mod.rs

// Profile routes for the logged-in user
pub mod user_router;
// User row and profile validation
pub mod user_structs;
