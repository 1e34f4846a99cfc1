//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Health check
//!
//! # Catalog
//! GET    /restaurants?cuisine=&q=        - Restaurant listing
//! GET    /restaurants/{id}               - Restaurant detail
//! GET    /restaurants/{id}/menu?category= - Menu
//! GET    /specials                       - Special offers
//!
//! # Cart
//! GET    /cart                           - Items, restaurant groups, totals
//! POST   /cart/items                     - Add one unit
//! PATCH  /cart/items/{id}                - Set quantity
//! DELETE /cart/items/{id}                - Remove item
//! DELETE /cart                           - Empty the cart
//!
//! # Orders
//! POST   /checkout                       - Place an order
//! GET    /orders                         - Active and past orders
//! GET    /orders/{id}                    - Order detail
//! GET    /orders/{id}/tracking           - Tracking snapshot
//! POST   /orders/{id}/tracking/deliver   - Confirm delivery
//! POST   /orders/{id}/tracking/cancel    - Cancel
//! GET    /track/{order_number}           - Public order lookup
//!
//! # Addresses
//! GET    /addresses                      - Address book
//! POST   /addresses                      - Add
//! PUT    /addresses/{id}                 - Replace
//! POST   /addresses/{id}/default         - Make default
//! DELETE /addresses/{id}                 - Delete (not the default)
//!
//! # Account
//! POST   /auth/login                     - Sign in
//! POST   /auth/register                  - Register
//! POST   /auth/logout                    - Sign out
//! GET    /profile                        - Profile
//! PUT    /profile                        - Update profile
//!
//! # Admin
//! GET    /admin/summary                  - Order counters and revenue
//! ```

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{id}", get(catalog::show))
        .route("/{id}/menu", get(catalog::menu))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{id}",
            axum::routing::patch(cart::update).delete(cart::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/tracking", get(orders::tracking))
        .route("/{id}/tracking/deliver", post(orders::deliver))
        .route("/{id}/tracking/cancel", post(orders::cancel))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route(
            "/{id}",
            axum::routing::put(addresses::update).delete(addresses::delete),
        )
        .route("/{id}/default", post(addresses::set_default))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/restaurants", catalog_routes())
        .route("/specials", get(catalog::specials))
        .nest("/cart", cart_routes())
        .route("/checkout", post(orders::checkout))
        .nest("/orders", order_routes())
        .route("/track/{order_number}", get(orders::by_number))
        .nest("/addresses", address_routes())
        .nest("/auth", auth_routes())
        .route("/profile", get(auth::profile).put(auth::update_profile))
        .route("/admin/summary", get(admin::summary))
}

/// The application with request IDs, request tracing and CORS applied.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .layer(CorsLayer::permissive())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use campus_eats_core::MemoryStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, StorefrontConfig};

    fn offline_state() -> AppState {
        let config = StorefrontConfig {
            api: ApiConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout: Duration::from_millis(200),
            },
            ..StorefrontConfig::default()
        };
        AppState::with_stores(
            config,
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )
        .unwrap()
    }

    fn offline_app() -> Router {
        app(offline_state())
    }

    async fn place_order(app: &Router) -> Value {
        send(
            app,
            "POST",
            "/cart/items",
            Some(json!({ "menuItemId": "item-1", "restaurantId": "rest-1" })),
        )
        .await;
        let form = json!({ "deliveryAddressId": "addr-1", "paymentMethod": "CASH" });
        let (status, order) = send(app, "POST", "/checkout", Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);
        order
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = offline_app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(crate::middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_restaurant_filters() {
        let app = offline_app();

        let (status, body) = send(&app, "GET", "/restaurants?cuisine=indian", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Curry Corner");

        let (_, body) = send(&app, "GET", "/restaurants?q=taco", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", "/restaurants/rest-6/menu?category=Bread", None).await;
        assert_eq!(body[0]["name"], "Garlic Naan");
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let app = offline_app();
        let naan = json!({ "menuItemId": "item-27" });

        send(&app, "POST", "/cart/items", Some(naan.clone())).await;
        let (status, body) = send(&app, "POST", "/cart/items", Some(naan)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["itemCount"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["groups"][0]["restaurantName"], "Curry Corner");

        let (_, body) = send(
            &app,
            "PATCH",
            "/cart/items/item-27",
            Some(json!({ "quantity": 0 })),
        )
        .await;
        assert_eq!(body["items"][0]["quantity"], 1);

        let (status, _) = send(&app, "DELETE", "/cart/items/item-404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/cart", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, "GET", "/cart", None).await;
        assert_eq!(body["itemCount"], 0);
    }

    #[tokio::test]
    async fn test_unknown_menu_item_is_not_found() {
        let app = offline_app();
        let (status, body) = send(
            &app,
            "POST",
            "/cart/items",
            Some(json!({ "menuItemId": "item-999" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("item-999"));
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_is_rejected() {
        let app = offline_app();
        let form = json!({ "deliveryAddressId": "addr-1", "paymentMethod": "CASH" });
        let (status, body) = send(&app, "POST", "/checkout", Some(form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Your cart is empty");
    }

    #[tokio::test]
    async fn test_checkout_then_track() {
        let state = offline_state();
        let app = app(state.clone());

        let (_, cart) = send(
            &app,
            "POST",
            "/cart/items",
            Some(json!({ "menuItemId": "item-1", "restaurantId": "rest-1" })),
        )
        .await;
        let form = json!({ "deliveryAddressId": "addr-1", "paymentMethod": "CASH" });
        let (status, order) = send(&app, "POST", "/checkout", Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["status"], "RECEIVED");
        assert_eq!(order["total"], cart["totals"]["total"]);
        let id = order["id"].as_str().unwrap();

        let (_, cart) = send(&app, "GET", "/cart", None).await;
        assert_eq!(cart["itemCount"], 0);

        let (_, tracking) = send(&app, "GET", &format!("/orders/{id}/tracking"), None).await;
        assert_eq!(tracking["status"], "RECEIVED");
        assert_eq!(tracking["progress"], 0);
        assert_eq!(state.running_trackers().await, 1);

        let (status, _) = send(&app, "POST", &format!("/orders/{id}/tracking/deliver"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, tracking) =
            send(&app, "POST", &format!("/orders/{id}/tracking/cancel"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracking["status"], "CANCELLED");
        assert_eq!(state.running_trackers().await, 0);

        let (status, _) = send(&app, "POST", &format!("/orders/{id}/tracking/cancel"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (_, tracking) = send(&app, "GET", &format!("/orders/{id}/tracking"), None).await;
        assert_eq!(tracking["status"], "CANCELLED");
        assert_eq!(state.running_trackers().await, 0);

        let (_, history) = send(&app, "GET", "/orders", None).await;
        assert_eq!(history["past"][0]["id"], id);
    }

    #[tokio::test]
    async fn test_unknown_orders_are_not_tracked() {
        let state = offline_state();
        let app = app(state.clone());

        for i in 0..20 {
            let (status, _) = send(&app, "GET", &format!("/orders/bogus-{i}/tracking"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        assert_eq!(state.running_trackers().await, 0);

        let (status, tracking) = send(&app, "GET", "/orders/order-3/tracking", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracking["status"], "PREPARING");

        let (status, tracking) = send(&app, "GET", "/orders/order-1/tracking", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracking["status"], "DELIVERED");
        assert_eq!(state.running_trackers().await, 1, "finished orders get no timer");
    }

    #[tokio::test]
    async fn test_default_address_cannot_be_deleted() {
        let app = offline_app();
        let (status, body) = send(&app, "DELETE", "/addresses/addr-1", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "The default address cannot be deleted");

        let (status, _) = send(&app, "POST", "/addresses/addr-3/default", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", "/addresses/addr-1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let app = offline_app();
        let (status, user) = send(
            &app,
            "POST",
            "/auth/login",
            Some(json!({ "username": "meera", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["email"], "meera@example.com");

        let (status, _) = send(&app, "POST", "/auth/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_admin_summary() {
        let app = offline_app();
        let (status, body) = send(&app, "GET", "/admin/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalOrders"], 3);
        assert_eq!(body["formattedRevenue"], json!(["₹3,139.00"]));
    }

    #[tokio::test]
    async fn test_admin_summary_counts_orders_placed_here() {
        let app = offline_app();
        let order = place_order(&app).await;
        let total: rust_decimal::Decimal = order["total"].as_str().unwrap().parse().unwrap();

        let (_, body) = send(&app, "GET", "/admin/summary", None).await;
        assert_eq!(body["totalOrders"], 4);
        assert_eq!(body["activeOrders"], 3);
        let expected = campus_eats_core::Price::new(
            rust_decimal::Decimal::from(3139) + total,
            campus_eats_core::CurrencyCode::INR,
        );
        assert_eq!(body["formattedRevenue"], json!([expected.display()]));

        let (_, history) = send(&app, "GET", "/orders", None).await;
        let listed = history["active"].as_array().unwrap().len() + history["past"].as_array().unwrap().len();
        assert_eq!(body["totalOrders"], listed);
    }
}
