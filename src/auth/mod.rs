// src/auth/mod.rs

// Request/response and JWT claim structs
pub mod auth_structs;
// OTP/login routes
pub mod auth_router;
// Bearer token extractor
pub mod auth_middleware;
// Code generation, hashing and expiry
pub mod otp;
// Signing and decoding of session tokens
pub mod token;
