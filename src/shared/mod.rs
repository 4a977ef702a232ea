// src/shared/mod.rs

// Response envelope shared by every route
pub mod shared_structs;
