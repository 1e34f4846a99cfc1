//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use campus_eats_core::RestaurantId;
use serde::Deserialize;
use tracing::instrument;

use crate::api::{MenuItem, Restaurant, SpecialOffer};
use crate::services::CatalogService;
use crate::state::AppState;

/// Restaurant listing filters. `q` wins over `cuisine` when both are set.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantQuery {
    pub cuisine: Option<String>,
    pub q: Option<String>,
}

/// Menu filter.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// List restaurants, optionally by cuisine or keyword.
///
/// GET /restaurants?cuisine=&q=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Json<Vec<Restaurant>> {
    let catalog = CatalogService::new(state.api(), state.fallback_policy());

    let restaurants = if let Some(keyword) = non_blank(query.q.as_ref()) {
        catalog.search_restaurants(keyword).await
    } else if let Some(cuisine) = non_blank(query.cuisine.as_ref()) {
        catalog.restaurants_by_cuisine(cuisine).await
    } else {
        catalog.restaurants().await
    };

    Json(restaurants)
}

/// Restaurant detail.
///
/// GET /restaurants/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<RestaurantId>) -> Json<Restaurant> {
    let catalog = CatalogService::new(state.api(), state.fallback_policy());
    Json(catalog.restaurant(&id).await)
}

/// Restaurant menu, optionally one category.
///
/// GET /restaurants/{id}/menu?category=
#[instrument(skip(state))]
pub async fn menu(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
    Query(query): Query<MenuQuery>,
) -> Json<Vec<MenuItem>> {
    let catalog = CatalogService::new(state.api(), state.fallback_policy());

    let items = match non_blank(query.category.as_ref()) {
        Some(category) => catalog.menu_items_by_category(&id, category).await,
        None => catalog.menu_items(&id).await,
    };

    Json(items)
}

/// Today's special offers.
///
/// GET /specials
#[instrument(skip(state))]
pub async fn specials(State(state): State<AppState>) -> Json<Vec<SpecialOffer>> {
    let catalog = CatalogService::new(state.api(), state.fallback_policy());
    Json(catalog.special_offers().await)
}
