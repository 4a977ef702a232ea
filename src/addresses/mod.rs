// src/addresses/mod.rs

// Address book routes (add, list, select default, update, delete)
pub mod address_router;
// Address row, client payload and checkout address lookup
pub mod address_structs;
