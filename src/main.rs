// src/main.rs

use std::sync::{Arc, RwLock};

use actix_web::{web, App, HttpServer};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

mod addresses; // Address book
mod auth;      // Phone/OTP authentication and bearer tokens
mod cart;      // Multi-category cart, hotel cart and checkout
mod config;
mod errors;
mod orders;
mod routes;
mod shared;
mod users;     // Profile
mod wishlist;

#[cfg(test)]
mod test_support;

use crate::cart::cart_structs::CartStore;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::wishlist::wishlist_structs::WishlistStore;

/// Shared state: database pool and configuration (JWT secret, OTP settings).
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
}

async fn connect(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Connected to PostgreSQL");

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }
    Ok(pool)
}

fn startup_error(e: AppError) -> std::io::Error {
    error!(error = %e, "Startup failed");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(startup_error)?;
    let db_pool = connect(&config).await.map_err(startup_error)?;
    let bind_address = config.bind_address();

    let app_state = web::Data::new(AppState {
        db_pool,
        config: Arc::new(config),
    });

    // Carts and wishlists live in memory only, one per authenticated user.
    let cart_store = web::Data::new(RwLock::new(CartStore::new()));
    let wishlist_store = web::Data::new(RwLock::new(WishlistStore::new()));

    info!("Starting shopfront API on {bind_address}");

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(TracingLogger::default())
            .app_data(app_state.clone())
            .app_data(cart_store.clone())
            .app_data(wishlist_store.clone())
            .configure(routes::configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
