// src/routes.rs

use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, get, web, HttpRequest, HttpResponse, Responder};

use crate::errors::AppError;
use crate::shared::shared_structs::GenericResponse;
use crate::{addresses, auth, cart, orders, users, wishlist};

#[get("/")]
async fn index() -> impl Responder {
    "API is running..."
}

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::success())
}

/// Malformed JSON bodies get the same `{ success: false, message }` shape as other errors.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Malformed payload: {err}")).into()
}

/// Any origin, method and header may call the API; the web client runs on
/// its own origin and sends the bearer token in `Authorization`.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Registers every route of the API. Shared by `main` and the HTTP tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(index)
        .service(health_check)
        // Auth
        .service(auth::auth_router::send_otp)
        .service(auth::auth_router::verify_otp)
        .service(auth::auth_router::register_send_otp)
        .service(auth::auth_router::register_verify_otp)
        .service(auth::auth_router::login_send_otp)
        .service(auth::auth_router::login_verify_otp)
        // User profile
        .service(users::user_router::get_me)
        .service(users::user_router::complete_profile)
        .service(users::user_router::send_update_otp)
        .service(users::user_router::verify_update_otp)
        // Address book ("select/{id}" before "{id}")
        .service(addresses::address_router::add_address)
        .service(addresses::address_router::get_addresses)
        .service(addresses::address_router::select_address)
        .service(addresses::address_router::update_address)
        .service(addresses::address_router::delete_address)
        // Cart ("items" before "{category}")
        .service(cart::cart_router::get_cart)
        .service(cart::cart_router::clear_cart)
        .service(cart::cart_router::add_item)
        .service(cart::cart_router::increase_quantity)
        .service(cart::cart_router::decrease_quantity)
        .service(cart::cart_router::remove_item)
        .service(cart::cart_router::checkout)
        .service(cart::cart_router::get_category)
        .service(cart::cart_router::clear_category)
        // Hotel cart
        .service(cart::cart_router::get_hotel_cart)
        .service(cart::cart_router::add_hotel)
        .service(cart::cart_router::clear_hotel_cart)
        // Wishlist
        .service(wishlist::wishlist_router::get_wishlist)
        .service(wishlist::wishlist_router::toggle_like)
        // Orders
        .service(orders::order_router::get_orders);
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::{Method, StatusCode},
        test, App,
    };
    use serde_json::Value;

    use super::*;

    #[actix_web::test]
    async fn health_and_index_respond() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(body["success"], true);
    }

    #[actix_web::test]
    async fn preflight_from_another_origin_is_allowed() {
        let app = test::init_service(App::new().wrap(cors()).configure(configure_routes)).await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/cart")
            .insert_header(("Origin", "http://localhost:8081"))
            .insert_header(("Access-Control-Request-Method", "GET"))
            .insert_header(("Access-Control-Request-Headers", "authorization"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:8081"
        );
    }
}
