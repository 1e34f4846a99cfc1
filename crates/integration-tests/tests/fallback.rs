//! Backend failure modes: every one of them degrades to fixture data.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use campus_eats_core::RestaurantId;
use campus_eats_integration_tests::{StubBackend, UNREACHABLE_URL, api_config};
use campus_eats_storefront::api::{ApiClient, ApiError, FallbackPolicy, call_with_fallback};
use campus_eats_storefront::fixtures;
use campus_eats_storefront::services::{CatalogService, OrderService};
use secrecy::SecretString;
use serde_json::json;

async fn catalog_names(api: &ApiClient) -> Vec<String> {
    CatalogService::new(api, FallbackPolicy::Loud)
        .restaurants()
        .await
        .into_iter()
        .map(|r| r.name)
        .collect()
}

fn fixture_names() -> Vec<String> {
    fixtures::restaurants().into_iter().map(|r| r.name).collect()
}

#[tokio::test]
async fn test_server_error_uses_fixtures() {
    let stub = StubBackend::start(Router::new().route(
        "/restaurants",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await
    .unwrap();
    let api = ApiClient::new(&stub.api_config()).unwrap();

    let err = api.restaurants().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(catalog_names(&api).await, fixture_names());
}

#[tokio::test]
async fn test_malformed_body_uses_fixtures() {
    let stub = StubBackend::start(Router::new().route(
        "/restaurants",
        get(|| async { ([(header::CONTENT_TYPE, "application/json")], "[{\"id\":") }),
    ))
    .await
    .unwrap();
    let api = ApiClient::new(&stub.api_config()).unwrap();

    assert!(matches!(api.restaurants().await, Err(ApiError::Parse(_))));
    assert_eq!(catalog_names(&api).await, fixture_names());
}

#[tokio::test]
async fn test_unreachable_backend_uses_fixtures() {
    let api = ApiClient::new(&api_config(UNREACHABLE_URL)).unwrap();

    assert!(matches!(api.restaurants().await, Err(ApiError::Http(_))));
    assert_eq!(catalog_names(&api).await, fixture_names());

    let menu = CatalogService::new(&api, FallbackPolicy::Quiet)
        .menu_items(&RestaurantId::new("rest-6"))
        .await;
    assert!(menu.iter().any(|item| item.name == "Garlic Naan"));
}

#[tokio::test]
async fn test_valid_response_is_used_and_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let stub = StubBackend::start(Router::new().route(
        "/restaurants",
        get(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                axum::Json(json!([{
                    "id": 42,
                    "name": "Stub Diner",
                    "cuisine": ["Diner"],
                    "rating": 4.0,
                    "deliveryTime": "15 min",
                    "deliveryFee": "10.00",
                    "minOrder": "50.00"
                }]))
            }
        }),
    ))
    .await
    .unwrap();
    let api = ApiClient::new(&stub.api_config()).unwrap();
    let catalog = CatalogService::new(&api, FallbackPolicy::Quiet);

    let first = catalog.restaurants().await;
    let second = catalog.restaurants().await;
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let diner = first.first().unwrap();
    assert_eq!(diner.id.as_str(), "42");
    assert_eq!(diner.name, "Stub Diner");
    assert!(!diner.image.is_empty(), "missing cover is filled in");

    api.invalidate_cache();
    catalog.restaurants().await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_user_calls_send_bearer_token() {
    let stub = StubBackend::start(Router::new().route(
        "/orders/user",
        get(|headers: HeaderMap| async move {
            let authorized = headers
                .get(header::AUTHORIZATION)
                .is_some_and(|value| value == "Bearer tok-123");
            if authorized {
                axum::Json(json!([])).into_response()
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }),
    ))
    .await
    .unwrap();
    let api = ApiClient::new(&stub.api_config()).unwrap();

    let good = SecretString::from("tok-123");
    let orders = OrderService::new(&api, FallbackPolicy::Quiet, Some(&good))
        .list()
        .await;
    assert!(orders.is_empty());

    let bad = SecretString::from("expired");
    let orders = OrderService::new(&api, FallbackPolicy::Quiet, Some(&bad))
        .list()
        .await;
    assert_eq!(orders.len(), 3, "rejected token falls back to mock orders");
}

#[tokio::test]
async fn test_fallback_is_transparent_to_callers() {
    let ok: Result<u32, &str> = Ok(7);
    assert_eq!(call_with_fallback(async { ok }, 0, "ok").await, 7);

    let failed: Result<u32, &str> = Err("nope");
    assert_eq!(call_with_fallback(async { failed }, 0, "failed").await, 0);
}
